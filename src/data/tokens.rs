use crate::data::client::{GraphQlTransport, SubgraphClient};
use crate::error::Result;
use serde::Deserialize;
use serde_json::json;

const TOKEN_QUERY: &str = r#"
query getTokenId($symbol: String!) {
    tokens(
        first: 1
        where: { symbol: $symbol }
        orderBy: volume
        orderDirection: desc
    ) {
        id
        name
    }
}
"#;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TokensReply {
    tokens: Vec<TokenRef>,
}

/// Symbols are not unique on-chain; the highest-volume match wins.
/// `Ok(None)` means the subgraph knows no token with that symbol.
pub async fn resolve_token<T: GraphQlTransport>(
    client: &SubgraphClient<T>,
    symbol: &str,
) -> Result<Option<TokenRef>> {
    let reply: TokensReply = client
        .query("getTokenId", TOKEN_QUERY, json!({ "symbol": symbol }))
        .await?;
    Ok(reply.tokens.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::client::stub::StubTransport;

    #[tokio::test]
    async fn first_result_is_the_resolved_token() {
        let client = SubgraphClient::new(StubTransport::with_replies(vec![json!({
            "tokens": [
                { "id": "0xc02a", "name": "Wrapped Ether" },
                { "id": "0xdead", "name": "Fake Ether" }
            ]
        })]));

        let token = resolve_token(&client, "WETH").await.unwrap();
        assert_eq!(
            token,
            Some(TokenRef {
                id: "0xc02a".to_string(),
                name: "Wrapped Ether".to_string()
            })
        );

        let calls = client.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, json!({ "symbol": "WETH" }));
        assert!(calls[0].0.contains("orderBy: volume"));
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let client = SubgraphClient::new(StubTransport::with_replies(vec![json!({
            "tokens": []
        })]));
        assert_eq!(resolve_token(&client, "NOPE").await.unwrap(), None);
    }
}
