//! Matrixcalc Server
//!
//! Newline-delimited JSON over stdin/stdout. Every input line gets exactly
//! one response line; logs go to stderr.
//!
//! Environment:
//! - MATRIXCALC_MAX_DIM: largest accepted row/column count (default 10)
//! - MATRIXCALC_EPSILON: zero tolerance (default 1e-10)
//! - MATRIXCALC_HISTORY_LIMIT: session history length (default 15)
//! - RUST_LOG: log filter (default info)

mod protocol;

use matrixcalc::{Calculator, EngineConfig, Session, DEFAULT_HISTORY_LIMIT};
use std::env;
use std::str::FromStr;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse an environment variable, falling back to `None` when absent or invalid
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

fn engine_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    if let Some(max_dim) = env_parse::<usize>("MATRIXCALC_MAX_DIM") {
        config = config.with_max_dim(max_dim);
    }
    if let Some(epsilon) = env_parse::<f64>("MATRIXCALC_EPSILON") {
        config = config.with_epsilon(epsilon);
    }
    config
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn write_line(stdout: &mut Stdout, line: &str) -> io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() {
    init_logging();

    let config = engine_config();
    let history_limit = env_parse::<usize>("MATRIXCALC_HISTORY_LIMIT").unwrap_or(DEFAULT_HISTORY_LIMIT);
    let calculator = Calculator::with_standard_operations().with_config(config);
    let mut session = Session::new(calculator).with_history_limit(history_limit);

    info!(
        version = SERVER_VERSION,
        max_dim = config.max_dim,
        epsilon = config.epsilon,
        history_limit,
        operations = session.calculator().operations().len(),
        "matrixcalc server ready, waiting for requests"
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received");

                let response = protocol::handle_line(&mut session, line);
                if let Err(e) = write_line(&mut stdout, &response).await {
                    error!("error writing response: {}", e);
                    break;
                }
            }
            Ok(None) => {
                info!("client disconnected (EOF)");
                break;
            }
            Err(e) => {
                error!("error reading input: {}", e);
                break;
            }
        }
    }

    info!("server shutting down");
}
