use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokenchart::commands::{self, ExtractArgs, ExtractOverrides};
use tokenchart::preview;
use tokenchart_domain::repositories::dataset_sink::SinkOutcome;
use tokenchart_domain::value_objects::api_config::Interval;

#[derive(Parser, Debug)]
#[command(name = "tokenchart")]
#[command(about = "Pulls CoinGecko market charts into one table.", version)]
struct Cli {
    /// Config file path (TOML). If omitted, uses env TOKENCHART_CONFIG, then defaults.
    #[arg(long, global = true, env = "TOKENCHART_CONFIG")]
    config: Option<PathBuf>,

    /// CoinGecko API key. Falls back to auth.api_key in the config file.
    #[arg(long, global = true, env = "COINGECKO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Serve Prometheus metrics on host:port.
    #[arg(long, global = true, env = "TOKENCHART_METRICS_ADDR")]
    metrics_addr: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every configured token and persist the combined dataset.
    Extract {
        #[arg(long)]
        days: Option<u32>,

        #[arg(long)]
        interval: Option<IntervalArg>,

        #[arg(long)]
        quote_currency: Option<String>,

        #[arg(long)]
        timeout_seconds: Option<u64>,

        /// Token as coin=id; repeat to replace the configured list.
        #[arg(long = "token")]
        tokens: Vec<String>,

        /// SQLite file to load into.
        #[arg(long)]
        sqlite: Option<PathBuf>,

        #[arg(long)]
        table: Option<String>,

        /// Also write the dataset as CSV.
        #[arg(long)]
        csv_out: Option<PathBuf>,

        /// Skip the SQLite load.
        #[arg(long)]
        no_store: bool,

        /// Rows to print after the run.
        #[arg(long, default_value_t = 5)]
        preview: usize,

        /// Print a JSON summary instead of the table preview.
        #[arg(long)]
        json: bool,
    },
    /// Check connectivity and credentials.
    Ping,
    /// Print the effective config with the API key masked.
    Config,
    /// Look up provider ids by coin name.
    Resolve {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum IntervalArg {
    Daily,
    Hourly,
}

fn main() {
    match commands::env_file_outcome(dotenvy::dotenv()) {
        Ok(_) => {}
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
    let cli = Cli::parse();

    if let Err(err) = init_tracing() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics(cli.metrics_addr.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let config_path = cli.config.filter(|p| !p.as_os_str().is_empty());
    let api_key = cli.api_key;

    let result = match cli.command {
        Command::Extract {
            days,
            interval,
            quote_currency,
            timeout_seconds,
            tokens,
            sqlite,
            table,
            csv_out,
            no_store,
            preview,
            json,
        } => {
            let interval = interval.map(|i| match i {
                IntervalArg::Daily => Interval::Daily,
                IntervalArg::Hourly => Interval::Hourly,
            });
            commands::run_extract(ExtractArgs {
                config_path,
                api_key,
                overrides: ExtractOverrides {
                    days,
                    interval,
                    quote_currency,
                    timeout_seconds,
                    tokens,
                    sqlite,
                    table,
                    csv_out,
                    no_store,
                },
            })
            .map(|summary| {
                if json {
                    println!(
                        "{}",
                        serde_json::to_string(&commands::summary_json(&summary))
                            .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
                    );
                    return;
                }
                let extraction = &summary.report.extraction;
                println!("rows: {}", extraction.dataset.len());
                if !extraction.failed_tokens.is_empty() {
                    println!("failed tokens: {}", extraction.failed_tokens.join(", "));
                }
                for (label, outcome) in summary.sinks.iter().zip(&summary.report.outcomes) {
                    match outcome {
                        SinkOutcome::Created { rows } => println!("{label}: created ({rows} rows)"),
                        SinkOutcome::Written { rows } => println!("{label}: written ({rows} rows)"),
                        SinkOutcome::AlreadyExists => {
                            println!("{label}: table already exists, nothing written")
                        }
                    }
                }
                if preview > 0 {
                    print!("{}", preview::render_head(&extraction.dataset, preview));
                }
            })
            .map_err(|err| format!("extraction workflow failed: {err}"))
        }
        Command::Ping => commands::run_ping(config_path.as_deref(), api_key.as_deref())
            .map(|()| println!("connection established")),
        Command::Config => {
            commands::render_config(config_path.as_deref()).map(|rendered| print!("{rendered}"))
        }
        Command::Resolve { names } => {
            commands::run_resolve(config_path.as_deref(), api_key.as_deref(), &names).map(
                |result| {
                    for token in &result.tokens {
                        println!("{} : {}", token.coin(), token.id());
                    }
                    for name in &result.unresolved {
                        eprintln!("no match: {name}");
                    }
                },
            )
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<(), String> {
    let filter = std::env::var("TOKENCHART_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics(raw: Option<&str>) -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    let addr: SocketAddr = raw
        .trim()
        .parse()
        .map_err(|err| format!("invalid metrics address (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics(_raw: Option<&str>) -> Result<Option<SocketAddr>, String> {
    Ok(None)
}
