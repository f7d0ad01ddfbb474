use crate::value_objects::coin_listing::CoinListing;
use crate::value_objects::token::Token;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupResult {
    pub tokens: Vec<Token>,
    pub unresolved: Vec<String>,
}

/// Matches catalogue entries by display name, case-insensitively.
///
/// Several listings may share a name; all of them are returned in catalogue order.
pub fn resolve_tokens(listings: &[CoinListing], names: &[String]) -> LookupResult {
    let wanted: Vec<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
    let mut matched = vec![false; wanted.len()];
    let mut tokens = Vec::new();

    for listing in listings {
        let name = listing.name.to_lowercase();
        let mut hit = false;
        for (idx, candidate) in wanted.iter().enumerate() {
            if *candidate == name {
                matched[idx] = true;
                hit = true;
            }
        }
        if hit {
            if let Ok(token) = Token::new(listing.name.clone(), listing.id.clone()) {
                tokens.push(token);
            }
        }
    }

    let unresolved = names
        .iter()
        .zip(matched)
        .filter(|(_, found)| !found)
        .map(|(name, _)| name.clone())
        .collect();

    LookupResult { tokens, unresolved }
}

#[cfg(test)]
mod tests {
    use super::resolve_tokens;
    use crate::value_objects::coin_listing::CoinListing;

    fn listing(id: &str, symbol: &str, name: &str) -> CoinListing {
        CoinListing {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            platforms: Default::default(),
        }
    }

    #[test]
    fn resolves_names_case_insensitively() {
        let listings = vec![
            listing("bitcoin", "btc", "Bitcoin"),
            listing("aave", "aave", "Aave"),
            listing("crypto-com-chain", "cro", "Cronos"),
            listing("chainlink", "link", "Chainlink"),
        ];
        let names = vec![
            "aave".to_string(),
            "CRONOS".to_string(),
            "chainlink".to_string(),
            "dogecoin".to_string(),
        ];

        let result = resolve_tokens(&listings, &names);
        let pairs: Vec<(&str, &str)> = result.tokens.iter().map(|t| (t.coin(), t.id())).collect();
        assert_eq!(
            pairs,
            vec![
                ("Aave", "aave"),
                ("Cronos", "crypto-com-chain"),
                ("Chainlink", "chainlink")
            ]
        );
        assert_eq!(result.unresolved, vec!["dogecoin".to_string()]);
    }
}
