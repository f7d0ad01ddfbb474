pub mod coin_directory;
pub mod dataset_sink;
pub mod market_chart;
