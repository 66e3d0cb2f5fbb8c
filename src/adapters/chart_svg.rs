//! SVG chart of strategy vs buy-and-hold cumulative returns.
//!
//! Styling (fonts, labels) lives in a [`ChartStyle`] built once by the caller
//! and handed to [`SvgChartAdapter`]; nothing here reads global state.

use std::fs;
use std::path::Path;

use log::info;

use crate::adapters::console_report::ReportLocale;
use crate::domain::backtest::{BacktestResult, ReturnRow, ReturnSeries};
use crate::domain::error::TrendsignalError;
use crate::ports::report_port::ChartPort;

const MARKET_COLOR: &str = "#1f77b4";
const STRATEGY_COLOR: &str = "#ff7f0e";
const GRID_LINES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub font_family: String,
    /// Shown after the symbol in the chart heading.
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub market_label: String,
    pub strategy_label: String,
}

impl ChartStyle {
    pub fn new(locale: ReportLocale, font_family: &str) -> Self {
        let (title, x_label, y_label, market_label, strategy_label) = match locale {
            ReportLocale::En => (
                "Cumulative Return Comparison",
                "Date",
                "Cumulative Return",
                "Buy & Hold",
                "Strategy",
            ),
            ReportLocale::Zh => (
                "累计收益对比",
                "日期",
                "累计收益",
                "买入持有",
                "策略",
            ),
        };

        Self {
            width: 1200.0,
            height: 500.0,
            padding: 60.0,
            font_family: font_family.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            market_label: market_label.to_string(),
            strategy_label: strategy_label.to_string(),
        }
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders both cumulative curves; empty string when there is nothing to plot.
pub fn generate_comparison_svg(returns: &ReturnSeries, style: &ChartStyle) -> String {
    let rows = &returns.rows;
    if rows.is_empty() {
        return String::new();
    }

    let (min_v, max_v) = rows
        .iter()
        .flat_map(|r| [r.cumulative_market, r.cumulative_strategy])
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let plot_width = style.width - 2.0 * style.padding;
    let plot_height = style.height - 2.0 * style.padding;
    let range = max_v - min_v;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if rows.len() > 1 {
        plot_width / (rows.len() - 1) as f64
    } else {
        0.0
    };

    let x_at = |i: usize| style.padding + i as f64 * scale_x;
    let y_at = |v: f64| style.height - style.padding - (v - min_v) * scale_y;

    let polyline = |value: fn(&ReturnRow) -> f64| -> String {
        rows.iter()
            .enumerate()
            .map(|(i, r)| format!("{:.1},{:.1}", x_at(i), y_at(value(r))))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="{font}">
<rect width="100%" height="100%" fill="white"/>
<text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" font-size="18">{title}</text>
"#,
        w = style.width,
        h = style.height,
        font = xml_escape(&style.font_family),
        cx = style.width / 2.0,
        ty = style.padding / 2.0,
        title = xml_escape(&format!("{} {}", returns.symbol, style.title)),
    );

    for step in 0..=GRID_LINES {
        let value = min_v + range * step as f64 / GRID_LINES as f64;
        let y = y_at(value);
        svg.push_str(&format!(
            r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#dddddd" stroke-width="1"/>
<text x="{lx:.1}" y="{y:.1}" text-anchor="end" font-size="11">{label:.0}%</text>
"##,
            x1 = style.padding,
            x2 = style.width - style.padding,
            lx = style.padding - 6.0,
            label = value * 100.0,
        ));
        if range <= 0.0 {
            break;
        }
    }

    let first = &rows[0];
    let last = &rows[rows.len() - 1];
    svg.push_str(&format!(
        r#"<text x="{x0:.1}" y="{dy:.1}" font-size="11">{d0}</text>
<text x="{x1:.1}" y="{dy:.1}" text-anchor="end" font-size="11">{d1}</text>
<text x="{cx:.1}" y="{xly:.1}" text-anchor="middle" font-size="13">{x_label}</text>
<text x="14" y="{cy:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 14 {cy:.1})">{y_label}</text>
"#,
        x0 = style.padding,
        x1 = style.width - style.padding,
        dy = style.height - style.padding + 16.0,
        d0 = first.date,
        d1 = last.date,
        cx = style.width / 2.0,
        xly = style.height - 12.0,
        x_label = xml_escape(&style.x_label),
        cy = style.height / 2.0,
        y_label = xml_escape(&style.y_label),
    ));

    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{MARKET_COLOR}" stroke-width="1.5" points="{}"/>
<polyline fill="none" stroke="{STRATEGY_COLOR}" stroke-width="1.5" points="{}"/>
"#,
        polyline(|r| r.cumulative_market),
        polyline(|r| r.cumulative_strategy),
    ));

    let lx = style.padding + 10.0;
    let ly = style.padding + 10.0;
    svg.push_str(&format!(
        r#"<line x1="{lx:.1}" y1="{ly:.1}" x2="{lx2:.1}" y2="{ly:.1}" stroke="{MARKET_COLOR}" stroke-width="2"/>
<text x="{tx:.1}" y="{ty1:.1}" font-size="12">{market}</text>
<line x1="{lx:.1}" y1="{ly2:.1}" x2="{lx2:.1}" y2="{ly2:.1}" stroke="{STRATEGY_COLOR}" stroke-width="2"/>
<text x="{tx:.1}" y="{ty2:.1}" font-size="12">{strategy}</text>
</svg>
"#,
        lx2 = lx + 20.0,
        ly2 = ly + 18.0,
        tx = lx + 26.0,
        ty1 = ly + 4.0,
        ty2 = ly + 22.0,
        market = xml_escape(&style.market_label),
        strategy = xml_escape(&style.strategy_label),
    ));

    svg
}

pub struct SvgChartAdapter {
    style: ChartStyle,
}

impl SvgChartAdapter {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(&self, result: &BacktestResult, output_path: &Path) -> Result<(), TrendsignalError> {
        let svg = generate_comparison_svg(&result.returns, &self.style);
        if svg.is_empty() {
            return Err(TrendsignalError::InvalidParameter {
                name: "returns".into(),
                reason: "no return rows to chart".into(),
            });
        }
        fs::write(output_path, svg)?;
        info!("chart written to {}", output_path.display());
        Ok(())
    }
}
