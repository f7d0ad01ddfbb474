use crate::errors::ExtractError;
use std::fmt;

/// A tracked coin: display name plus the provider's identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    coin: String,
    id: String,
}

impl Token {
    pub fn new(coin: impl Into<String>, id: impl Into<String>) -> Result<Self, ExtractError> {
        let coin = coin.into().trim().to_string();
        let id = id.into().trim().to_string();
        if coin.is_empty() {
            return Err(ExtractError::configuration(format!(
                "token coin is required (id={id:?})"
            )));
        }
        if id.is_empty() {
            return Err(ExtractError::configuration(format!(
                "token id is required (coin={coin:?})"
            )));
        }
        Ok(Self { coin, id })
    }

    /// Parses the `coin=id` form used on the command line.
    pub fn parse_pair(value: &str) -> Result<Self, ExtractError> {
        let (coin, id) = value.split_once('=').ok_or_else(|| {
            ExtractError::configuration(format!("invalid token {value:?}: expected coin=id"))
        })?;
        Self::new(coin, id)
    }

    pub fn coin(&self) -> &str {
        &self.coin
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.coin, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::Token;
    use crate::errors::ExtractError;

    #[test]
    fn rejects_empty_coin_or_id() {
        assert!(matches!(
            Token::new("", "aave"),
            Err(ExtractError::Configuration(_))
        ));
        assert!(matches!(
            Token::new("aave", "   "),
            Err(ExtractError::Configuration(_))
        ));
    }

    #[test]
    fn stores_trimmed_values() {
        let token = Token::new(" aave\t", " aave ").unwrap();
        assert_eq!(token.coin(), "aave");
        assert_eq!(token.id(), "aave");
    }

    #[test]
    fn parse_pair_splits_on_first_equals() {
        let token = Token::parse_pair("cronos = crypto-com-chain").unwrap();
        assert_eq!(token.coin(), "cronos");
        assert_eq!(token.id(), "crypto-com-chain");

        assert!(Token::parse_pair("cronos").is_err());
        assert!(Token::parse_pair("=aave").is_err());
    }
}
