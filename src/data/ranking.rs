use crate::data::client::{parse_decimal, GraphQlTransport, SubgraphClient};
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;

pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 100;

/// Tokens without recent trading get dropped, so ask for more than needed.
const OVERFETCH_FACTOR: u32 = 2;

const TOP_TOKENS_QUERY: &str = r#"
query getTopTokens($minVolume: BigDecimal!, $timestamp: Int!, $limit: Int!) {
    tokens(
        first: $limit
        where: { totalValueLockedUSD_gt: $minVolume }
    ) {
        id
        symbol
        name
        decimals
        totalValueLockedUSD
        tokenDayData(
            first: 1
            orderBy: date
            orderDirection: desc
            where: { date_gt: $timestamp }
        ) {
            date
            priceUSD
            volumeUSD
        }
    }
}
"#;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    pub total_value_locked_usd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayData {
    pub date: DateTime<Utc>,
    pub price_usd: f64,
    pub volume_usd: f64,
}

/// A token together with the daily records the subgraph attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenActivity {
    pub token: Token,
    pub day_data: Vec<DayData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedToken {
    pub symbol: String,
    pub price: f64,
    pub volume_24h: f64,
    pub tvl: f64,
}

#[derive(Debug, Deserialize)]
struct RawToken {
    id: String,
    symbol: String,
    name: String,
    decimals: String,
    #[serde(rename = "totalValueLockedUSD")]
    total_value_locked_usd: String,
    #[serde(rename = "tokenDayData", default)]
    token_day_data: Vec<RawDayData>,
}

#[derive(Debug, Deserialize)]
struct RawDayData {
    date: i64,
    #[serde(rename = "priceUSD")]
    price_usd: String,
    #[serde(rename = "volumeUSD")]
    volume_usd: String,
}

#[derive(Debug, Deserialize)]
struct TopTokensReply {
    tokens: Vec<RawToken>,
}

impl TryFrom<RawDayData> for DayData {
    type Error = AppError;

    fn try_from(raw: RawDayData) -> Result<Self> {
        let date = DateTime::from_timestamp(raw.date, 0).ok_or_else(|| AppError::InvalidNumber {
            field: "date",
            value: raw.date.to_string(),
        })?;

        Ok(DayData {
            date,
            price_usd: parse_decimal("priceUSD", &raw.price_usd)?,
            volume_usd: parse_decimal("volumeUSD", &raw.volume_usd)?,
        })
    }
}

impl TryFrom<RawToken> for TokenActivity {
    type Error = AppError;

    fn try_from(raw: RawToken) -> Result<Self> {
        let decimals = raw
            .decimals
            .trim()
            .parse::<u32>()
            .map_err(|_| AppError::InvalidNumber {
                field: "decimals",
                value: raw.decimals.clone(),
            })?;

        let token = Token {
            id: raw.id,
            symbol: raw.symbol,
            name: raw.name,
            decimals,
            total_value_locked_usd: parse_decimal(
                "totalValueLockedUSD",
                &raw.total_value_locked_usd,
            )?,
        };

        let day_data = raw
            .token_day_data
            .into_iter()
            .map(DayData::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(TokenActivity { token, day_data })
    }
}

pub fn validate_limit(limit: u32) -> Result<()> {
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::InvalidArgument(format!(
            "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"
        )));
    }
    Ok(())
}

pub fn lookback_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(24)
}

/// Every token with a nonzero-volume day record newer than `cutoff`, sorted
/// by that volume, highest first. Equal volumes keep their reply order.
pub fn rank_candidates(tokens: Vec<TokenActivity>, cutoff: DateTime<Utc>) -> Vec<RankedToken> {
    let mut ranked: Vec<RankedToken> = tokens
        .into_iter()
        .filter_map(|activity| {
            let latest = activity
                .day_data
                .iter()
                .filter(|day| day.date > cutoff)
                .max_by_key(|day| day.date)?;

            if latest.volume_usd == 0.0 {
                return None;
            }

            Some(RankedToken {
                symbol: activity.token.symbol.clone(),
                price: latest.price_usd,
                volume_24h: latest.volume_usd,
                tvl: activity.token.total_value_locked_usd,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.volume_24h.total_cmp(&a.volume_24h));
    ranked
}

pub fn rank_tokens(
    tokens: Vec<TokenActivity>,
    cutoff: DateTime<Utc>,
    limit: u32,
) -> Vec<RankedToken> {
    let mut ranked = rank_candidates(tokens, cutoff);
    ranked.truncate(limit as usize);
    ranked
}

/// `min_tvl` filters on total value locked, not on traded volume; the
/// command line still calls it `--min-volume`.
pub async fn fetch_ranked_tokens<T: GraphQlTransport>(
    client: &SubgraphClient<T>,
    limit: u32,
    min_tvl: f64,
    now: DateTime<Utc>,
) -> Result<Vec<RankedToken>> {
    validate_limit(limit)?;
    if !min_tvl.is_finite() || min_tvl < 0.0 {
        return Err(AppError::InvalidArgument(format!(
            "minimum volume must be a non-negative amount, got {min_tvl}"
        )));
    }

    let cutoff = lookback_cutoff(now);
    let reply: TopTokensReply = client
        .query(
            "getTopTokens",
            TOP_TOKENS_QUERY,
            json!({
                "minVolume": min_tvl.to_string(),
                "timestamp": cutoff.timestamp(),
                "limit": limit * OVERFETCH_FACTOR,
            }),
        )
        .await?;

    let fetched = reply.tokens.len();
    let tokens = reply
        .tokens
        .into_iter()
        .map(TokenActivity::try_from)
        .collect::<Result<Vec<_>>>()?;

    let ranked = rank_tokens(tokens, cutoff, limit);
    tracing::debug!(fetched, kept = ranked.len(), "ranked tokens by 24h volume");
    Ok(ranked)
}
