pub mod coingecko;
pub mod persistence;
