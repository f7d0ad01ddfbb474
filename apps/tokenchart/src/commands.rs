use serde_json::json;
use std::path::{Path, PathBuf};
use tokenchart_application::config::{load_config, to_toml_redacted, Config, TokenConfig};
use tokenchart_application::extraction::{run_pipeline, PipelineReport};
use tokenchart_application::lookup::lookup_tokens;
use tokenchart_domain::errors::ExtractError;
use tokenchart_domain::repositories::dataset_sink::{DatasetSink, SinkOutcome};
use tokenchart_domain::repositories::market_chart::MarketChartProvider;
use tokenchart_domain::services::coin_lookup::LookupResult;
use tokenchart_domain::value_objects::api_config::Interval;
use tokenchart_domain::value_objects::token::Token;
use tokenchart_infrastructure::coingecko::CoinGeckoClient;
use tokenchart_infrastructure::persistence::csv_export::CsvDatasetSink;
use tokenchart_infrastructure::persistence::sqlite::SqliteDatasetSink;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ExtractOverrides {
    pub days: Option<u32>,
    pub interval: Option<Interval>,
    pub quote_currency: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub tokens: Vec<String>,
    pub sqlite: Option<PathBuf>,
    pub table: Option<String>,
    pub csv_out: Option<PathBuf>,
    pub no_store: bool,
}

pub struct ExtractArgs {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub overrides: ExtractOverrides,
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub report: PipelineReport,
    pub sinks: Vec<String>,
}

/// A missing `.env` is fine; one that exists but does not parse is an error.
pub fn env_file_outcome<T>(result: Result<T, dotenvy::Error>) -> Result<Option<T>, String> {
    match result {
        Ok(loaded) => Ok(Some(loaded)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(format!("failed to load .env: {err}")),
    }
}

/// Reads the config file when one is given, otherwise starts from defaults.
pub fn load_effective_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

pub fn apply_overrides(config: &mut Config, overrides: &ExtractOverrides) -> Result<(), String> {
    if let Some(days) = overrides.days {
        config.api.days = days;
    }
    if let Some(interval) = overrides.interval {
        config.api.interval = interval;
    }
    if let Some(currency) = &overrides.quote_currency {
        config.api.quote_currency = currency.trim().to_lowercase();
    }
    if let Some(timeout) = overrides.timeout_seconds {
        config.api.timeout_seconds = timeout;
    }
    if !overrides.tokens.is_empty() {
        config.tokens = overrides
            .tokens
            .iter()
            .map(|pair| {
                Token::parse_pair(pair).map(|token| TokenConfig {
                    coin: token.coin().to_string(),
                    id: token.id().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.to_string())?;
    }
    if let Some(path) = &overrides.sqlite {
        config.sink.sqlite_path = path.display().to_string();
    }
    if let Some(table) = &overrides.table {
        config.sink.table = table.clone();
    }
    if let Some(path) = &overrides.csv_out {
        config.sink.csv_path = Some(path.display().to_string());
    }
    if overrides.no_store {
        config.sink.enabled = false;
    }
    Ok(())
}

/// The command-line key wins over the config file; blank values count as missing.
pub fn resolve_api_key(cli_key: Option<&str>, config: &Config) -> Result<String, ExtractError> {
    cli_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            config
                .auth
                .api_key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
        })
        .map(|key| key.trim().to_string())
        .ok_or_else(|| {
            ExtractError::configuration(
                "missing --api-key, env COINGECKO_API_KEY and auth.api_key in config",
            )
        })
}

fn build_client(cli_key: Option<&str>, config: &Config) -> Result<CoinGeckoClient, ExtractError> {
    let api_key = resolve_api_key(cli_key, config)?;
    CoinGeckoClient::new(&api_key, config.api.clone())
}

fn build_sinks(config: &Config) -> Result<Vec<Box<dyn DatasetSink>>, String> {
    let mut sinks: Vec<Box<dyn DatasetSink>> = Vec::new();
    if config.sink.enabled {
        sinks.push(Box::new(SqliteDatasetSink::new(
            &config.sink.sqlite_path,
            &config.sink.table,
        )?));
    }
    if let Some(path) = config.sink.csv_path.as_deref() {
        sinks.push(Box::new(CsvDatasetSink::new(path)));
    }
    Ok(sinks)
}

fn sink_labels(config: &Config) -> Vec<String> {
    let mut labels = Vec::new();
    if config.sink.enabled {
        labels.push(format!("sqlite:{}#{}", config.sink.sqlite_path, config.sink.table));
    }
    if let Some(path) = config.sink.csv_path.as_deref() {
        labels.push(format!("csv:{path}"));
    }
    labels
}

pub fn run_extract(args: ExtractArgs) -> Result<ExtractSummary, String> {
    let mut config = load_effective_config(args.config_path.as_deref())?;
    apply_overrides(&mut config, &args.overrides)?;
    config.validate().map_err(|err| err.to_string())?;

    let registry = config.registry().map_err(|err| err.to_string())?;
    let sinks = build_sinks(&config)?;
    let sink_refs: Vec<&dyn DatasetSink> = sinks.iter().map(|sink| sink.as_ref()).collect();

    let report = {
        let client =
            build_client(args.api_key.as_deref(), &config).map_err(|err| err.to_string())?;
        run_pipeline(&client, &sink_refs, registry.tokens(), &config.api)
            .map_err(|err| err.to_string())?
    };

    Ok(ExtractSummary {
        report,
        sinks: sink_labels(&config),
    })
}

pub fn run_ping(config_path: Option<&Path>, api_key: Option<&str>) -> Result<(), String> {
    let config = load_effective_config(config_path)?;
    config.api.validate().map_err(|err| err.to_string())?;
    let client = build_client(api_key, &config).map_err(|err| err.to_string())?;
    client.ping().map_err(|err| err.to_string())
}

pub fn run_resolve(
    config_path: Option<&Path>,
    api_key: Option<&str>,
    names: &[String],
) -> Result<LookupResult, String> {
    let config = load_effective_config(config_path)?;
    config.api.validate().map_err(|err| err.to_string())?;
    let client = build_client(api_key, &config).map_err(|err| err.to_string())?;
    lookup_tokens(&client, names).map_err(|err| err.to_string())
}

/// Effective config as TOML with the API key masked.
pub fn render_config(config_path: Option<&Path>) -> Result<String, String> {
    let config = load_effective_config(config_path)?;
    config.validate().map_err(|err| err.to_string())?;
    to_toml_redacted(&config)
}

fn outcome_json(outcome: &SinkOutcome) -> serde_json::Value {
    match outcome {
        SinkOutcome::Created { rows } => json!({"status": "created", "rows": rows}),
        SinkOutcome::AlreadyExists => json!({"status": "already_exists"}),
        SinkOutcome::Written { rows } => json!({"status": "written", "rows": rows}),
    }
}

pub fn summary_json(summary: &ExtractSummary) -> serde_json::Value {
    let extraction = &summary.report.extraction;
    let sinks: Vec<serde_json::Value> = summary
        .sinks
        .iter()
        .zip(&summary.report.outcomes)
        .map(|(label, outcome)| {
            let mut value = outcome_json(outcome);
            value["sink"] = json!(label);
            value
        })
        .collect();
    json!({
        "status": "ok",
        "rows": extraction.dataset.len(),
        "coins": extraction.dataset.coins(),
        "failed_tokens": extraction.failed_tokens,
        "sinks": sinks,
    })
}
