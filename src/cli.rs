use crate::ui::Timeframe;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Uniswap v3 token analytics tool", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a price chart saved as interactive HTML and static PNG
    Chart(ChartArgs),
    /// List top tokens by trading volume in the last 24 hours
    Top(TopArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ChartArgs {
    /// Token symbol to chart (e.g. WBTC, WETH, LINK)
    #[arg(default_value = "WETH")]
    pub token_symbol: String,

    /// Timeframe for each candle
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = Timeframe::OneDay)]
    pub timeframe: Timeframe,

    /// Number of data points to fetch
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub points: u32,

    /// Directory the chart files are written to
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TopArgs {
    /// Number of top tokens to show
    #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: u32,

    /// Minimum total value locked in USD a token needs to be listed
    #[arg(short, long, default_value_t = 1000.0, value_parser = parse_min_volume)]
    pub min_volume: f64,
}

fn parse_min_volume(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("`{raw}` must be a non-negative amount"));
    }
    Ok(value)
}
