//! somewhere - SomewhereIRC terminal client
//!
//! Usage: `somewhere [config.toml]` (defaults to `client.toml`).

use std::sync::Arc;

use parking_lot::Mutex;
use somewhere_irc::config::{self, Config};
use somewhere_irc::console::{read_input_line, Connections};
use somewhere_irc::display::WriterSink;
use somewhere_irc::engine::ConnectionEngine;
use somewhere_irc::transport::TcpTransport;
use tokio::io::BufReader;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the conversation
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "client.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    let stdout = Arc::new(Mutex::new(std::io::stdout()));
    let console = WriterSink::new(Arc::clone(&stdout));
    let transport = TcpTransport::new(config.engine.max_line_len, config.engine.connect_timeout());

    let mut connections = Connections::new();
    let mut engines = JoinSet::new();

    for conn in config.connections() {
        let label = format!("{}:{}", conn.host, conn.port);
        let sink = WriterSink::new(Arc::clone(&stdout))
            .with_label(label.clone())
            .with_timestamps(config.display.timestamps);
        let (engine, handle) =
            ConnectionEngine::new(conn, config.engine.clone(), transport.clone(), sink);

        let index = connections.push(label.clone(), handle);
        engines.spawn(async move { (index, engine.run().await) });
        info!(index, %label, "Engine spawned");
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut pending = Vec::new();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = read_input_line(&mut stdin, &mut pending), if stdin_open => match line {
                Ok(Some(line)) => connections.handle_input(&line, &console),
                Ok(None) => {
                    info!("Input closed, shutting down");
                    stdin_open = false;
                    connections.shutdown_all();
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    stdin_open = false;
                    connections.shutdown_all();
                }
            },

            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                connections.shutdown_all();
            }

            finished = engines.join_next() => match finished {
                Some(Ok((index, Ok(())))) => {
                    info!(index, "Connection finished");
                }
                Some(Ok((index, Err(e)))) => {
                    warn!(index, error = %e, code = e.error_code(), "Connection ended");
                }
                Some(Err(e)) => {
                    error!(error = %e, "Engine task failed");
                }
                None => break,
            },
        }
    }

    info!("All connections closed");
    Ok(())
}
