use crate::cli::{ChartArgs, TopArgs};
use crate::config::AppConfig;
use crate::data::{
    chronological, fetch_ranked_tokens, fetch_series, filter_range, normalize_symbol,
    resolve_token, GraphQlTransport, PricePoint, SubgraphClient, TimeWindow, TokenRef,
};
use crate::error::Result;
use crate::ui::{render_chart, render_table, ChartArtifacts, Timeframe};
use chrono::{DateTime, NaiveDate, Utc};
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    pub symbol: String,
    pub token: TokenRef,
    /// Records the subgraph returned, before range filtering.
    pub fetched: usize,
    /// In-range points, oldest first.
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    TokenNotFound { symbol: String },
    NoData {
        symbol: String,
        token: TokenRef,
    },
    NoDataInRange {
        symbol: String,
        token: TokenRef,
        fetched: usize,
    },
    Ready(PreparedSeries),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    TokenNotFound,
    NoData,
    NoDataInRange,
    Rendered(ChartArtifacts),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopOutcome {
    NoTokens,
    Listed(usize),
}

/// Resolves the token and returns the in-range part of its series, ready to
/// be drawn. Empty outcomes are reported as variants, not errors.
pub async fn prepare_series<T: GraphQlTransport>(
    client: &SubgraphClient<T>,
    raw_symbol: &str,
    timeframe: Timeframe,
    points: u32,
    now: DateTime<Utc>,
) -> Result<SeriesOutcome> {
    let symbol = normalize_symbol(raw_symbol);

    let Some(token) = resolve_token(client, &symbol).await? else {
        return Ok(SeriesOutcome::TokenNotFound { symbol });
    };
    tracing::info!(symbol = %symbol, id = %token.id, "resolved token");

    let series = fetch_series(client, &token.id, timeframe.granularity(), points).await?;
    if series.is_empty() {
        return Ok(SeriesOutcome::NoData { symbol, token });
    }

    let fetched = series.len();
    let window = TimeWindow::ending_at(now, timeframe.minutes_per_point(), points);
    let in_range = filter_range(&series, &window);
    if in_range.is_empty() {
        return Ok(SeriesOutcome::NoDataInRange {
            symbol,
            token,
            fetched,
        });
    }

    Ok(SeriesOutcome::Ready(PreparedSeries {
        symbol,
        token,
        fetched,
        points: chronological(in_range),
    }))
}

pub async fn run_chart<T: GraphQlTransport, W: Write>(
    client: &SubgraphClient<T>,
    config: &AppConfig,
    args: &ChartArgs,
    now: DateTime<Utc>,
    today: NaiveDate,
    out: &mut W,
) -> Result<ChartOutcome> {
    let outcome = prepare_series(
        client,
        &args.token_symbol,
        args.timeframe,
        args.points,
        now,
    )
    .await?;

    let prepared = match outcome {
        SeriesOutcome::TokenNotFound { symbol } => {
            writeln!(out, "No token found with symbol {}", symbol)?;
            return Ok(ChartOutcome::TokenNotFound);
        }
        SeriesOutcome::NoData { symbol, token } => {
            print_token(out, &symbol, &token)?;
            writeln!(out, "No data found for token {}", symbol)?;
            return Ok(ChartOutcome::NoData);
        }
        SeriesOutcome::NoDataInRange {
            symbol,
            token,
            fetched,
        } => {
            print_token(out, &symbol, &token)?;
            tracing::debug!(fetched, "all fetched records fell outside the window");
            writeln!(out, "No data found for the specified timeframe")?;
            return Ok(ChartOutcome::NoDataInRange);
        }
        SeriesOutcome::Ready(prepared) => prepared,
    };

    print_token(out, &prepared.symbol, &prepared.token)?;
    tracing::info!(
        fetched = prepared.fetched,
        in_range = prepared.points.len(),
        "charting series"
    );

    let artifacts = render_chart(
        &prepared.points,
        &prepared.symbol,
        args.timeframe,
        &config.output_dir,
        today,
    )?;
    writeln!(
        out,
        "Interactive chart has been saved to {}",
        artifacts.html.display()
    )?;
    writeln!(out, "Static chart has been saved to {}", artifacts.png.display())?;

    Ok(ChartOutcome::Rendered(artifacts))
}

fn print_token<W: Write>(out: &mut W, symbol: &str, token: &TokenRef) -> Result<()> {
    writeln!(out, "Symbol: {}, ID: {}, Name: {}", symbol, token.id, token.name)?;
    Ok(())
}

pub async fn run_top<T: GraphQlTransport, W: Write>(
    client: &SubgraphClient<T>,
    args: &TopArgs,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<TopOutcome> {
    let ranked = fetch_ranked_tokens(client, args.limit, args.min_volume, now).await?;
    if ranked.is_empty() {
        writeln!(out, "No tokens found")?;
        return Ok(TopOutcome::NoTokens);
    }

    render_table(out, args.limit, &ranked)?;
    Ok(TopOutcome::Listed(ranked.len()))
}
