use crate::data::RankedToken;
use std::io::{self, Write};

/// `$1,234.57`-style amount with `decimals` digits after the point.
pub fn format_usd(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) => format!("{sign}${grouped}.{fraction}"),
        None => format!("{sign}${grouped}"),
    }
}

pub fn render_table<W: Write>(out: &mut W, limit: u32, tokens: &[RankedToken]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Top {} tokens by 24h volume:", limit)?;
    writeln!(
        out,
        "{:<10} {:<15} {:<20} {:<15}",
        "Symbol", "Price (USD)", "24h Volume (USD)", "TVL (USD)"
    )?;
    writeln!(out, "{}", "-".repeat(60))?;

    for token in tokens {
        writeln!(
            out,
            "{:<10} {:<15} {:<20} {:<15}",
            token.symbol,
            format_usd(token.price, 2),
            format_usd(token.volume_24h, 0),
            format_usd(token.tvl, 0)
        )?;
    }

    Ok(())
}
