use serde::Deserialize;
use std::collections::BTreeMap;

/// Entry of the provider's coin catalogue (`/coins/list`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinListing {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub platforms: BTreeMap<String, Option<String>>,
}
