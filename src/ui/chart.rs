use crate::data::{Granularity, PricePoint};
use crate::error::{AppError, Result};
use crate::ui::Timeframe;
use chrono::{DateTime, NaiveDate, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::{Display, Write as _};
use std::path::{Path, PathBuf};

const CHART_SIZE: (u32, u32) = (1280, 800);
const PRICE_SHARE: f64 = 0.7;

const BACKGROUND: RGBColor = RGBColor(17, 17, 17);
const GRID: RGBColor = RGBColor(31, 31, 31);
const AXIS: RGBColor = RGBColor(90, 90, 90);
const TEXT: RGBColor = RGBColor(220, 220, 220);
const CANDLE_UP: RGBColor = RGBColor(38, 166, 154);
const CANDLE_DOWN: RGBColor = RGBColor(239, 83, 80);
const VOLUME_BAR: RGBColor = RGBColor(92, 107, 192);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifacts {
    pub html: PathBuf,
    pub png: PathBuf,
}

pub fn artifact_stem(symbol: &str, timeframe: Timeframe, date: NaiveDate) -> String {
    format!(
        "{}_chart_{}_{}",
        symbol,
        timeframe.label(),
        date.format("%Y%m%d")
    )
}

/// Writes the interactive HTML page and the PNG snapshot for an ascending
/// series. An empty series is refused rather than drawn as a blank chart.
pub fn render_chart(
    points: &[PricePoint],
    symbol: &str,
    timeframe: Timeframe,
    out_dir: &Path,
    date: NaiveDate,
) -> Result<ChartArtifacts> {
    if points.is_empty() {
        return Err(AppError::InvalidArgument(
            "cannot chart an empty series".to_string(),
        ));
    }

    let stem = artifact_stem(symbol, timeframe, date);
    let html = out_dir.join(format!("{stem}.html"));
    let png = out_dir.join(format!("{stem}.png"));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw_chart(&root, points, symbol, timeframe)?;
        root.present().map_err(chart_err)?;
    }

    // Both files or neither: the PNG goes first and is removed if the page fails.
    if let Err(err) = write_png(&png, points, symbol, timeframe) {
        let _ = std::fs::remove_file(&png);
        return Err(err);
    }
    tracing::debug!(path = %png.display(), "wrote png chart");

    if let Err(err) = std::fs::write(&html, html_document(symbol, timeframe, &svg, points)) {
        let _ = std::fs::remove_file(&png);
        return Err(err.into());
    }
    tracing::debug!(path = %html.display(), "wrote html chart");

    Ok(ChartArtifacts { html, png })
}

fn write_png(path: &Path, points: &[PricePoint], symbol: &str, timeframe: Timeframe) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    draw_chart(&root, points, symbol, timeframe)?;
    root.present().map_err(chart_err)
}

fn chart_err<E: Display>(err: E) -> AppError {
    AppError::Chart(err.to_string())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[PricePoint],
    symbol: &str,
    timeframe: Timeframe,
) -> Result<()> {
    root.fill(&BACKGROUND).map_err(chart_err)?;
    let root = root
        .titled(
            &format!("{} Price Chart", symbol),
            ("sans-serif", 28).into_font().color(&TEXT),
        )
        .map_err(chart_err)?;

    let (width, height) = root.dim_in_pixel();
    let price_height = (height as f64 * PRICE_SHARE) as u32;
    let (price_area, volume_area) = root.split_vertically(price_height);

    let half_period = timeframe.period() / 2;
    let x_range = (points[0].period_start - half_period)
        ..(points[points.len() - 1].period_start + half_period);
    let (price_low, price_high) = price_bounds(points);
    let volume_high = points.iter().fold(0.0f64, |max, p| max.max(p.volume));
    let volume_high = if volume_high > 0.0 { volume_high * 1.1 } else { 1.0 };

    let date_format = match timeframe.granularity() {
        Granularity::Hourly => "%m-%d %H:%M",
        Granularity::Daily => "%Y-%m-%d",
    };
    let label_style = ("sans-serif", 14).into_font().color(&TEXT);

    let mut price_chart = ChartBuilder::on(&price_area)
        .margin(10)
        .x_label_area_size(0)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range.clone(), price_low..price_high)
        .map_err(chart_err)?;

    price_chart
        .configure_mesh()
        .light_line_style(&BACKGROUND)
        .bold_line_style(&GRID)
        .axis_style(&AXIS)
        .label_style(label_style.clone())
        .axis_desc_style(label_style.clone())
        .y_desc("Price (USD)")
        .y_label_formatter(&|v: &f64| format!("{:.2}", v))
        .draw()
        .map_err(chart_err)?;

    let candle_px = candle_width(width, points.len());
    price_chart
        .draw_series(points.iter().map(|p| {
            CandleStick::new(
                p.period_start,
                p.open,
                p.high,
                p.low,
                p.close,
                CANDLE_UP.filled(),
                CANDLE_DOWN.filled(),
                candle_px,
            )
        }))
        .map_err(chart_err)?;

    let mut volume_chart = ChartBuilder::on(&volume_area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range, 0f64..volume_high)
        .map_err(chart_err)?;

    volume_chart
        .configure_mesh()
        .light_line_style(&BACKGROUND)
        .bold_line_style(&GRID)
        .axis_style(&AXIS)
        .label_style(label_style.clone())
        .axis_desc_style(label_style)
        .y_desc("Volume (USD)")
        .x_labels(8)
        .x_label_formatter(&|d: &DateTime<Utc>| d.format(date_format).to_string())
        .y_label_formatter(&|v: &f64| compact_amount(*v))
        .draw()
        .map_err(chart_err)?;

    let half_bar = timeframe.period() * 2 / 5;
    volume_chart
        .draw_series(points.iter().map(|p| {
            Rectangle::new(
                [
                    (p.period_start - half_bar, 0.0),
                    (p.period_start + half_bar, p.volume),
                ],
                VOLUME_BAR.filled(),
            )
        }))
        .map_err(chart_err)?;

    Ok(())
}

fn price_bounds(points: &[PricePoint]) -> (f64, f64) {
    let (low, high) = points.iter().fold((f64::MAX, f64::MIN), |(min, max), p| {
        (min.min(p.low), max.max(p.high))
    });
    let pad = ((high - low) * 0.05).max(high.abs() * 0.001).max(0.0001);
    (low - pad, high + pad)
}

fn candle_width(chart_width: u32, count: usize) -> u32 {
    let slot = chart_width as f64 / count.max(1) as f64;
    (slot * 0.6).clamp(1.0, 40.0) as u32
}

fn compact_amount(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn html_document(
    symbol: &str,
    timeframe: Timeframe,
    svg: &str,
    points: &[PricePoint],
) -> String {
    let title = format!("{} Price Chart ({})", escape_html(symbol), timeframe.label());

    let mut rows = String::new();
    for p in points {
        let direction = if p.close >= p.open { "up" } else { "down" };
        let _ = writeln!(
            rows,
            "<tr class=\"{dir}\" title=\"O {o:.4} H {h:.4} L {l:.4} C {c:.4}\"><td>{date}</td><td>{o:.4}</td><td>{h:.4}</td><td>{l:.4}</td><td>{c:.4}</td><td>{v:.0}</td></tr>",
            dir = direction,
            date = p.period_start.format("%Y-%m-%d %H:%M UTC"),
            o = p.open,
            h = p.high,
            l = p.low,
            c = p.close,
            v = p.volume,
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ background: #111111; color: #dcdcdc; font-family: sans-serif; margin: 24px; }}
svg {{ max-width: 100%; height: auto; }}
table {{ border-collapse: collapse; margin-top: 12px; }}
td, th {{ border-bottom: 1px solid #1f1f1f; padding: 4px 12px; text-align: right; }}
tr:hover {{ background: #1f1f1f; }}
tr.up td:nth-child(5) {{ color: #26A69A; }}
tr.down td:nth-child(5) {{ color: #EF5350; }}
</style>
</head>
<body>
<h1>{title}</h1>
{svg}
<details>
<summary>{count} candles</summary>
<table>
<tr><th>Period (UTC)</th><th>Open</th><th>High</th><th>Low</th><th>Close</th><th>Volume (USD)</th></tr>
{rows}</table>
</details>
</body>
</html>
"#,
        title = title,
        svg = svg,
        count = points.len(),
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(ts: i64, open: f64, close: f64) -> PricePoint {
        PricePoint {
            period_start: Utc.timestamp_opt(ts, 0).unwrap(),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: 1234.0,
        }
    }

    #[test]
    fn artifact_names_follow_symbol_timeframe_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            artifact_stem("WETH", Timeframe::FourHours, date),
            "WETH_chart_4h_20240309"
        );
    }

    #[test]
    fn empty_series_is_not_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = render_chart(&[], "WETH", Timeframe::OneDay, dir.path(), date).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_png_leaves_no_html_behind() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let stem = artifact_stem("WETH", Timeframe::OneDay, date);
        // A directory where the PNG should go makes the bitmap write fail.
        std::fs::create_dir(dir.path().join(format!("{stem}.png"))).unwrap();

        let points = vec![point(1_700_000_000, 10.0, 12.0), point(1_700_086_400, 12.0, 11.0)];
        let result = render_chart(&points, "WETH", Timeframe::OneDay, dir.path(), date);

        assert!(result.is_err());
        assert!(!dir.path().join(format!("{stem}.html")).exists());
    }

    #[test]
    fn html_embeds_svg_and_one_row_per_candle() {
        let points = vec![point(1_700_000_000, 10.0, 12.0), point(1_700_086_400, 12.0, 11.0)];
        let html = html_document("WETH", Timeframe::OneDay, "<svg id=\"c\"></svg>", &points);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>WETH Price Chart (1d)</title>"));
        assert!(html.contains("<svg id=\"c\"></svg>"));
        assert!(html.contains("<summary>2 candles</summary>"));
        assert_eq!(html.matches("<tr class=\"up\"").count(), 1);
        assert_eq!(html.matches("<tr class=\"down\"").count(), 1);
        assert!(html.contains("2023-11-14 22:13 UTC"));
    }

    #[test]
    fn symbols_are_escaped_in_html() {
        let html = html_document("<X&Y>", Timeframe::OneHour, "", &[]);
        assert!(html.contains("&lt;X&amp;Y&gt;"));
        assert!(!html.contains("<X&Y>"));
    }

    #[test]
    fn price_bounds_pad_flat_series() {
        let flat = vec![PricePoint {
            period_start: Utc.timestamp_opt(0, 0).unwrap(),
            open: 5.0,
            high: 5.0,
            low: 5.0,
            close: 5.0,
            volume: 0.0,
        }];
        let (low, high) = price_bounds(&flat);
        assert!(low < 5.0 && high > 5.0);
    }

    #[test]
    fn candle_width_stays_in_bounds() {
        assert_eq!(candle_width(1280, 1), 40);
        assert_eq!(candle_width(1280, 1000), 1);
        assert_eq!(candle_width(1000, 100), 6);
    }

    #[test]
    fn compact_amounts() {
        assert_eq!(compact_amount(950.0), "950");
        assert_eq!(compact_amount(12_500.0), "12.5K");
        assert_eq!(compact_amount(3_400_000.0), "3.4M");
        assert_eq!(compact_amount(2_000_000_000.0), "2.0B");
    }
}
