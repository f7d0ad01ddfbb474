use tokenchart_domain::errors::ExtractError;
use tokenchart_domain::repositories::coin_directory::CoinDirectory;
use tokenchart_domain::services::coin_lookup::{resolve_tokens, LookupResult};

/// Looks up provider ids for the given display names.
pub fn lookup_tokens<D>(directory: &D, names: &[String]) -> Result<LookupResult, ExtractError>
where
    D: CoinDirectory + ?Sized,
{
    if names.iter().all(|name| name.trim().is_empty()) {
        return Err(ExtractError::configuration("at least one coin name is required"));
    }

    let listings = directory.list_coins()?;
    tracing::info!(listings = listings.len(), "coin catalogue loaded");

    let result = resolve_tokens(&listings, names);
    if !result.unresolved.is_empty() {
        tracing::warn!(unresolved = ?result.unresolved, "some coin names did not match");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::lookup_tokens;
    use std::cell::Cell;
    use tokenchart_domain::errors::ExtractError;
    use tokenchart_domain::repositories::coin_directory::CoinDirectory;
    use tokenchart_domain::value_objects::coin_listing::CoinListing;

    struct StaticDirectory {
        calls: Cell<u32>,
    }

    impl CoinDirectory for StaticDirectory {
        fn list_coins(&self) -> Result<Vec<CoinListing>, ExtractError> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![CoinListing {
                id: "chainlink".to_string(),
                symbol: "link".to_string(),
                name: "Chainlink".to_string(),
                platforms: Default::default(),
            }])
        }
    }

    #[test]
    fn empty_names_fail_before_listing() {
        let directory = StaticDirectory { calls: Cell::new(0) };
        let err = lookup_tokens(&directory, &[" ".to_string()]).unwrap_err();
        assert!(matches!(err, ExtractError::Configuration(_)));
        assert_eq!(directory.calls.get(), 0);
    }

    #[test]
    fn resolves_against_directory() {
        let directory = StaticDirectory { calls: Cell::new(0) };
        let result = lookup_tokens(&directory, &["chainlink".to_string()]).unwrap();
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.tokens[0].id(), "chainlink");
        assert!(result.unresolved.is_empty());
    }
}
