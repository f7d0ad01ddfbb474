use std::fmt;
use std::time::Instant;
use tokenchart_domain::entities::dataset::CombinedDataset;
use tokenchart_domain::errors::ExtractError;
use tokenchart_domain::repositories::dataset_sink::{DatasetSink, SinkOutcome};
use tokenchart_domain::repositories::market_chart::MarketChartProvider;
use tokenchart_domain::services::normalizer::normalize;
use tokenchart_domain::value_objects::api_config::ApiConfig;
use tokenchart_domain::value_objects::market_row::NormalizedRow;
use tokenchart_domain::value_objects::token::Token;

/// Progress of one extraction run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ConnectivityChecked,
    Fetching,
    Normalizing,
    Accumulated,
    Failed,
    Finalized,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::ConnectivityChecked => "connectivity_checked",
            RunState::Fetching => "fetching",
            RunState::Normalizing => "normalizing",
            RunState::Accumulated => "accumulated",
            RunState::Failed => "failed",
            RunState::Finalized => "finalized",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub dataset: CombinedDataset,
    pub failed_tokens: Vec<String>,
}

fn enter(state: &mut RunState, next: RunState) {
    tracing::trace!(from = state.as_str(), to = next.as_str(), "extraction state");
    *state = next;
}

/// Runs the connectivity probe, then fetches every token in order.
///
/// Only a failed probe or a run where every token failed is fatal; individual
/// token failures are logged and reported in [`Extraction::failed_tokens`].
pub fn extract_all<P>(
    provider: &P,
    tokens: &[Token],
    config: &ApiConfig,
) -> Result<Extraction, ExtractError>
where
    P: MarketChartProvider + ?Sized,
{
    let span = tracing::info_span!(
        "app.extraction.extract_all",
        tokens = tokens.len(),
        vs_currency = %config.quote_currency,
        days = config.days,
        interval = config.interval.as_str()
    );
    let _enter = span.enter();
    let start = Instant::now();

    config.validate()?;
    if tokens.is_empty() {
        return Err(ExtractError::configuration("at least one token is required"));
    }

    let mut state = RunState::Idle;
    if let Err(err) = provider.ping() {
        tracing::error!(error = %err, "connectivity check failed");
        metrics::counter!("tokenchart.app.extraction.runs_total", "result" => "ping_failed")
            .increment(1);
        return Err(err);
    }
    enter(&mut state, RunState::ConnectivityChecked);
    tracing::info!("connection established with provider");

    let mut parts: Vec<Vec<NormalizedRow>> = Vec::with_capacity(tokens.len());
    let mut failed_tokens: Vec<String> = Vec::new();

    for token in tokens {
        enter(&mut state, RunState::Fetching);
        tracing::info!(coin = token.coin(), id = token.id(), "fetching market chart");
        let outcome = provider
            .fetch_market_chart(token, config)
            .and_then(|raw| {
                enter(&mut state, RunState::Normalizing);
                normalize(&raw, token.coin())
            });

        match outcome {
            Ok(rows) => {
                enter(&mut state, RunState::Accumulated);
                tracing::info!(coin = token.coin(), rows = rows.len(), "token data ready");
                metrics::counter!("tokenchart.app.extraction.tokens_total", "result" => "ok")
                    .increment(1);
                parts.push(rows);
            }
            Err(err) => {
                enter(&mut state, RunState::Failed);
                tracing::error!(
                    coin = token.coin(),
                    kind = err.kind(),
                    error = %err,
                    "failed to process token"
                );
                metrics::counter!(
                    "tokenchart.app.extraction.tokens_total",
                    "result" => "err",
                    "kind" => err.kind()
                )
                .increment(1);
                failed_tokens.push(token.coin().to_string());
            }
        }
    }

    enter(&mut state, RunState::Finalized);
    metrics::histogram!("tokenchart.app.extraction.run_ms")
        .record(start.elapsed().as_millis() as f64);

    if parts.is_empty() {
        metrics::counter!("tokenchart.app.extraction.runs_total", "result" => "no_data")
            .increment(1);
        return Err(ExtractError::NoData { failed_tokens });
    }

    if !failed_tokens.is_empty() {
        tracing::warn!(failed = ?failed_tokens, "some tokens failed");
    }

    let dataset = CombinedDataset::concat(parts);
    metrics::counter!("tokenchart.app.extraction.runs_total", "result" => "ok").increment(1);
    tracing::info!(rows = dataset.len(), "extraction complete");

    Ok(Extraction {
        dataset,
        failed_tokens,
    })
}

#[derive(Debug)]
pub enum PipelineError {
    Extract(ExtractError),
    Sink(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Extract(err) => write!(f, "{err}"),
            PipelineError::Sink(msg) => write!(f, "sink error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Extract(err) => Some(err),
            PipelineError::Sink(_) => None,
        }
    }
}

impl From<ExtractError> for PipelineError {
    fn from(err: ExtractError) -> Self {
        PipelineError::Extract(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub extraction: Extraction,
    pub outcomes: Vec<SinkOutcome>,
}

/// Extracts every token and hands the combined dataset to each sink in order.
pub fn run_pipeline<P>(
    provider: &P,
    sinks: &[&dyn DatasetSink],
    tokens: &[Token],
    config: &ApiConfig,
) -> Result<PipelineReport, PipelineError>
where
    P: MarketChartProvider + ?Sized,
{
    let extraction = extract_all(provider, tokens, config)?;

    let mut outcomes = Vec::with_capacity(sinks.len());
    for sink in sinks {
        let outcome = sink
            .write_dataset(&extraction.dataset)
            .map_err(PipelineError::Sink)?;
        match outcome {
            SinkOutcome::AlreadyExists => {
                tracing::warn!("target table already exists; dataset was not written")
            }
            SinkOutcome::Created { rows } | SinkOutcome::Written { rows } => {
                tracing::info!(rows, "dataset persisted")
            }
        }
        outcomes.push(outcome);
    }

    Ok(PipelineReport {
        extraction,
        outcomes,
    })
}
