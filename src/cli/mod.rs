use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::Ledger;
use crate::http::{build_app, AppState};
use crate::io::Exporter;
use crate::telemetry::{self, LogFormat};

/// Caixa - in-memory bank-account ledger
#[derive(Parser)]
#[command(name = "caixa")]
#[command(about = "An in-memory bank-account ledger served over HTTP")]
#[command(version)]
pub struct Cli {
    /// Default log filter when RUST_LOG is not set
    #[arg(long, env = "CAIXA_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(
        long,
        env = "CAIXA_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty,
        global = true
    )]
    pub log_format: LogFormat,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "CAIXA_BIND", default_value = "0.0.0.0:3000")]
        bind: String,

        /// Write a JSON snapshot of every customer here on shutdown
        #[arg(long)]
        snapshot_on_exit: Option<PathBuf>,
    },
}

impl Cli {
    fn effective_log_level(&self) -> &str {
        if self.verbose { "debug" } else { self.log_level.as_str() }
    }

    pub async fn run(self) -> Result<()> {
        telemetry::init(self.effective_log_level(), self.log_format);

        match self.command {
            Commands::Serve {
                bind,
                snapshot_on_exit,
            } => run_serve_command(&bind, snapshot_on_exit.as_deref()).await,
        }
    }
}

async fn run_serve_command(bind: &str, snapshot_on_exit: Option<&Path>) -> Result<()> {
    let ledger = Arc::new(Ledger::new());
    let app = build_app(AppState::new(Arc::clone(&ledger)));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!(customers = ledger.customer_count(), "server stopped");

    if let Some(path) = snapshot_on_exit {
        write_snapshot(&ledger, path)?;
    }
    Ok(())
}

fn write_snapshot(ledger: &Ledger, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create snapshot file {}", path.display()))?;
    let snapshot = Exporter::new(ledger).export_snapshot_json(BufWriter::new(file))?;
    tracing::info!(
        path = %path.display(),
        customers = snapshot.customers.len(),
        "snapshot written"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::io::LedgerSnapshot;

    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["caixa", "serve"]);
        assert_eq!(cli.log_format, LogFormat::Pretty);
        match cli.command {
            Commands::Serve {
                bind,
                snapshot_on_exit,
            } => {
                assert_eq!(bind, "0.0.0.0:3000");
                assert!(snapshot_on_exit.is_none());
            }
        }
    }

    #[test]
    fn test_verbose_raises_log_level() {
        let cli = Cli::parse_from(["caixa", "serve", "--verbose", "--log-level", "warn"]);
        assert_eq!(cli.effective_log_level(), "debug");

        let cli = Cli::parse_from([
            "caixa",
            "--log-format",
            "json",
            "serve",
            "--bind",
            "127.0.0.1:8080",
        ]);
        assert_eq!(cli.effective_log_level(), "info");
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_snapshot_on_exit_flag() {
        let cli = Cli::parse_from(["caixa", "serve", "--snapshot-on-exit", "ledger.json"]);
        match cli.command {
            Commands::Serve {
                snapshot_on_exit, ..
            } => assert_eq!(snapshot_on_exit, Some(PathBuf::from("ledger.json"))),
        }
    }

    #[test]
    fn test_write_snapshot() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("snapshot.json");

        let ledger = Ledger::new();
        ledger.register_customer("222".into(), "Bob".into())?;
        ledger.register_customer("111".into(), "Alice".into())?;
        let alice = ledger.find_by_cpf("111")?;
        ledger.deposit(&alice, 10000, Some("salary".into()))?;

        write_snapshot(&ledger, &path)?;

        let snapshot: LedgerSnapshot = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(snapshot.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(snapshot.customers.len(), 2);
        assert_eq!(snapshot.customers[0].cpf, "111");
        assert_eq!(snapshot.customers[0].statement.len(), 1);
        assert_eq!(snapshot.customers[1].name, "Bob");
        Ok(())
    }

    #[test]
    fn test_write_snapshot_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("snapshot.json");

        let err = write_snapshot(&Ledger::new(), &path).unwrap_err();
        assert!(err.to_string().contains("Failed to create snapshot file"));
    }
}
