use crate::data::client::{parse_decimal, GraphQlTransport, SubgraphClient};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

pub const MIN_POINTS: u32 = 1;
pub const MAX_POINTS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Hourly,
    Daily,
}

impl Granularity {
    pub fn entity(&self) -> &'static str {
        match self {
            Granularity::Hourly => "tokenHourDatas",
            Granularity::Daily => "tokenDayDatas",
        }
    }

    pub fn period_field(&self) -> &'static str {
        match self {
            Granularity::Hourly => "periodStartUnix",
            Granularity::Daily => "date",
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            Granularity::Hourly => "getHourlyData",
            Granularity::Daily => "getDailyData",
        }
    }

    fn query(&self) -> String {
        format!(
            r#"
query {operation}($token: String!, $points: Int!) {{
    records: {entity}(
        first: $points
        orderBy: {field}
        orderDirection: desc
        where: {{ token: $token }}
    ) {{
        periodStart: {field}
        open
        high
        low
        close
        volumeUSD
    }}
}}
"#,
            operation = self.operation(),
            entity = self.entity(),
            field = self.period_field(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub period_start: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// USD volume traded during the period.
    pub volume: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RawPricePoint {
    #[serde(rename = "periodStart")]
    period_start: i64,
    open: String,
    high: String,
    low: String,
    close: String,
    #[serde(rename = "volumeUSD")]
    volume_usd: String,
}

#[derive(Debug, Deserialize)]
struct SeriesReply {
    records: Vec<RawPricePoint>,
}

impl TryFrom<RawPricePoint> for PricePoint {
    type Error = AppError;

    fn try_from(raw: RawPricePoint) -> Result<Self> {
        let period_start = DateTime::from_timestamp(raw.period_start, 0).ok_or_else(|| {
            AppError::InvalidNumber {
                field: "periodStart",
                value: raw.period_start.to_string(),
            }
        })?;

        Ok(PricePoint {
            period_start,
            open: parse_decimal("open", &raw.open)?,
            high: parse_decimal("high", &raw.high)?,
            low: parse_decimal("low", &raw.low)?,
            close: parse_decimal("close", &raw.close)?,
            volume: parse_decimal("volumeUSD", &raw.volume_usd)?,
        })
    }
}

pub fn validate_points(points: u32) -> Result<()> {
    if !(MIN_POINTS..=MAX_POINTS).contains(&points) {
        return Err(AppError::InvalidArgument(format!(
            "points must be between {MIN_POINTS} and {MAX_POINTS}, got {points}"
        )));
    }
    Ok(())
}

/// Fetches up to `points` most recent records, newest first. Fewer records
/// than requested is not an error; callers get whatever the subgraph holds.
pub async fn fetch_series<T: GraphQlTransport>(
    client: &SubgraphClient<T>,
    token_id: &str,
    granularity: Granularity,
    points: u32,
) -> Result<Vec<PricePoint>> {
    validate_points(points)?;

    let reply: SeriesReply = client
        .query(
            granularity.operation(),
            &granularity.query(),
            json!({ "token": token_id, "points": points }),
        )
        .await?;

    let series = reply
        .records
        .into_iter()
        .map(PricePoint::try_from)
        .collect::<Result<Vec<_>>>()?;

    if series.len() < points as usize {
        tracing::debug!(
            requested = points,
            received = series.len(),
            "subgraph returned fewer records than requested"
        );
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::client::stub::StubTransport;
    use serde_json::Value;

    fn record(ts: i64, close: &str, volume_usd: &str) -> Value {
        json!({
            "periodStart": ts,
            "open": "100.0",
            "high": "110.5",
            "low": "95.25",
            "close": close,
            "volumeUSD": volume_usd
        })
    }

    #[test]
    fn point_bounds() {
        assert!(validate_points(1).is_ok());
        assert!(validate_points(1000).is_ok());
        assert!(matches!(validate_points(0), Err(AppError::InvalidArgument(_))));
        assert!(matches!(validate_points(1001), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn hourly_query_orders_by_period_start() {
        let query = Granularity::Hourly.query();
        assert!(query.contains("records: tokenHourDatas("));
        assert!(query.contains("orderBy: periodStartUnix"));
        assert!(query.contains("periodStart: periodStartUnix"));
        assert!(query.contains("orderDirection: desc"));
    }

    #[test]
    fn daily_query_orders_by_date() {
        let query = Granularity::Daily.query();
        assert!(query.contains("records: tokenDayDatas("));
        assert!(query.contains("orderBy: date"));
        assert!(query.contains("periodStart: date"));
        assert!(query.contains("volumeUSD"));
        assert!(!query.contains("volume\n"));
    }

    #[tokio::test]
    async fn records_are_converted_in_fetch_order() {
        let client = SubgraphClient::new(StubTransport::with_replies(vec![json!({
            "records": [
                record(1_700_086_400, "105.0", "5000"),
                record(1_700_000_000, "101.0", "4000")
            ]
        })]));

        let series = fetch_series(&client, "0xc02a", Granularity::Daily, 100)
            .await
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period_start.timestamp(), 1_700_086_400);
        assert_eq!(series[0].close, 105.0);
        assert_eq!(series[0].volume, 5000.0);
        assert_eq!(series[1].low, 95.25);

        let calls = client.transport().calls();
        assert_eq!(calls[0].1, json!({ "token": "0xc02a", "points": 100 }));
    }

    #[tokio::test]
    async fn empty_series_is_not_an_error() {
        let client =
            SubgraphClient::new(StubTransport::with_replies(vec![json!({ "records": [] })]));
        let series = fetch_series(&client, "0x1", Granularity::Hourly, 10)
            .await
            .unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_points_never_reach_the_subgraph() {
        let client = SubgraphClient::new(StubTransport::default());
        let err = fetch_series(&client, "0x1", Granularity::Hourly, 1001)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_decimal_is_reported() {
        let client = SubgraphClient::new(StubTransport::with_replies(vec![json!({
            "records": [record(1_700_000_000, "oops", "1")]
        })]));
        let err = fetch_series(&client, "0x1", Granularity::Daily, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidNumber { field: "close", .. }));
    }
}
