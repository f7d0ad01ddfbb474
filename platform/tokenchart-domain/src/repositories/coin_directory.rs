use crate::errors::ExtractError;
use crate::value_objects::coin_listing::CoinListing;

pub trait CoinDirectory {
    fn list_coins(&self) -> Result<Vec<CoinListing>, ExtractError>;
}
