use crate::errors::ExtractError;
use crate::value_objects::token::Token;

/// Coins tracked when no explicit list is configured: `(coin, provider id)`.
pub const DEFAULT_TOKENS: &[(&str, &str)] = &[
    ("aave", "aave"),
    ("cronos", "crypto-com-chain"),
    ("chainlink", "chainlink"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl TokenRegistry {
    /// Builds the registry in the given order, failing on the first invalid entry.
    pub fn from_pairs<I, C, D>(pairs: I) -> Result<Self, ExtractError>
    where
        I: IntoIterator<Item = (C, D)>,
        C: Into<String>,
        D: Into<String>,
    {
        let tokens = pairs
            .into_iter()
            .map(|(coin, id)| Token::new(coin, id))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tokens(tokens)
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self, ExtractError> {
        if tokens.is_empty() {
            return Err(ExtractError::configuration("token list must not be empty"));
        }
        Ok(Self { tokens })
    }

    pub fn builtin() -> Self {
        Self {
            tokens: DEFAULT_TOKENS
                .iter()
                .filter_map(|(coin, id)| Token::new(*coin, *id).ok())
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::TokenRegistry;
    use crate::errors::ExtractError;

    #[test]
    fn builtin_registry_keeps_declared_order() {
        let registry = TokenRegistry::builtin();
        let ids: Vec<&str> = registry.tokens().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["aave", "crypto-com-chain", "chainlink"]);
        assert_eq!(registry.tokens()[1].coin(), "cronos");
    }

    #[test]
    fn from_pairs_fails_on_empty_field() {
        let err = TokenRegistry::from_pairs([("bitcoin", "bitcoin"), ("ethereum", "")]).unwrap_err();
        assert!(matches!(err, ExtractError::Configuration(_)));
    }

    #[test]
    fn from_pairs_rejects_empty_list() {
        let pairs: Vec<(String, String)> = Vec::new();
        assert!(TokenRegistry::from_pairs(pairs).is_err());
    }
}
