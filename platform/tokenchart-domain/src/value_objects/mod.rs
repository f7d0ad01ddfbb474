pub mod api_config;
pub mod coin_listing;
pub mod market_row;
pub mod token;
