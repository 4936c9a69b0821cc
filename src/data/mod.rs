pub mod client;
pub mod range;
pub mod ranking;
pub mod series;
pub mod symbols;
pub mod tokens;

pub use client::{GraphQlTransport, HttpTransport, SubgraphClient};
pub use range::{chronological, filter_range, TimeWindow};
pub use ranking::{fetch_ranked_tokens, RankedToken};
pub use series::{fetch_series, Granularity, PricePoint};
pub use symbols::normalize_symbol;
pub use tokens::{resolve_token, TokenRef};
