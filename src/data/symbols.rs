/// Maps the informal tickers people type to the wrapped tokens that actually
/// trade on Uniswap.
pub fn normalize_symbol(symbol: &str) -> String {
    let symbol = symbol.to_uppercase();
    match symbol.as_str() {
        "BTC" => "WBTC".to_string(),
        "ETH" => "WETH".to_string(),
        _ => symbol,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_wrapped_tokens() {
        assert_eq!(normalize_symbol("eth"), "WETH");
        assert_eq!(normalize_symbol("btc"), "WBTC");
        assert_eq!(normalize_symbol("Eth"), "WETH");
    }

    #[test]
    fn other_symbols_are_uppercased() {
        assert_eq!(normalize_symbol("link"), "LINK");
        assert_eq!(normalize_symbol("WETH"), "WETH");
        assert_eq!(normalize_symbol(""), "");
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        for s in ["eth", "btc", "link", "wBtC", "usdc", "", "ETH2", "ß"] {
            let once = normalize_symbol(s);
            assert_eq!(normalize_symbol(&once), once, "input {s:?}");
        }
    }
}
