//! Assize daemon — reads commands from stdin, writes replies and events to stdout.

mod config;
mod error;
mod protocol;
mod sequencer;
mod shutdown;

use anyhow::Context;
use assize_adjudication::AdjudicationEngine;
use assize_utils::LogFormat;
use clap::Parser;
use config::{DaemonConfig, EntropyChoice};
use protocol::Output;
use sequencer::Sequencer;
use shutdown::ShutdownController;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "assize-daemon", about = "Assize claims adjudication daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base; flags and
    /// env vars override them.
    #[arg(long, env = "ASSIZE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ASSIZE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ASSIZE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Time between deadline sweeps, e.g. "30s", "5m".
    #[arg(long, env = "ASSIZE_SWEEP_INTERVAL")]
    sweep_interval: Option<String>,

    /// Snapshot file restored on start and written on shutdown.
    #[arg(long, env = "ASSIZE_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Seed provider: "os" draws juries automatically, "external" expects seeds
    /// on select_jury commands.
    #[arg(long, env = "ASSIZE_ENTROPY")]
    entropy: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the daemon.
    Run,
    /// Print the effective configuration as TOML.
    PrintConfig,
    /// Validate the configuration and exit.
    CheckConfig,
}

impl Cli {
    fn effective_config(&self) -> anyhow::Result<DaemonConfig> {
        let mut config = match &self.config {
            Some(path) => DaemonConfig::from_toml_file(path)?,
            None => DaemonConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.parse::<LogFormat>()?;
        }
        if let Some(interval) = &self.sweep_interval {
            config.sweep_interval_secs = assize_utils::parse_duration(interval)
                .with_context(|| format!("invalid sweep interval {interval:?}"))?;
        }
        if let Some(path) = &self.state_file {
            config.state_file = Some(path.clone());
        }
        if let Some(entropy) = &self.entropy {
            config.entropy = entropy.parse::<EntropyChoice>()?;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.effective_config()?;

    match cli.command {
        Command::PrintConfig => {
            print!("{}", config.to_toml_string()?);
        }
        Command::CheckConfig => {
            println!("configuration ok");
        }
        Command::Run => {
            assize_utils::init_logging(config.log_format, &config.log_level)?;
            run(config).await?;
        }
    }
    Ok(())
}

async fn run(config: DaemonConfig) -> anyhow::Result<()> {
    let engine = load_engine(&config)?;
    tracing::info!(
        entropy = ?config.entropy,
        sweep_secs = config.sweep_interval_secs,
        claims = engine.registry().len(),
        jurors = engine.pool().len(),
        "assize daemon starting"
    );

    let shutdown = ShutdownController::new();
    let (request_tx, request_rx) = mpsc::channel(config.queue_depth);
    let (output_tx, mut output_rx) = mpsc::channel::<Output>(config.queue_depth);

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(output) = output_rx.recv().await {
            let mut line = output.to_line();
            line.push('\n');
            if let Err(e) = stdout.write_all(line.as_bytes()).await {
                tracing::error!(error = %e, "stdout write failed");
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    let reader_outputs = output_tx.clone();
    let mut reader_stop = shutdown.subscribe();
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = reader_stop.recv() => break,
            };
            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "stdin read failed");
                    break;
                }
            };
            match protocol::parse_line(&line) {
                None => continue,
                Some(Ok(request)) => {
                    if request_tx.send(request).await.is_err() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "unparseable command");
                    let reply = Output::err(None, "input", e.to_string());
                    if reader_outputs.send(reply).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    let signals = shutdown.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    let sequencer = Sequencer::new(engine, &config);
    let sequencer = sequencer
        .run(
            request_rx,
            output_tx,
            Duration::from_secs(config.sweep_interval_secs),
            shutdown.subscribe(),
        )
        .await;

    shutdown.shutdown();
    reader.abort();
    let _ = writer.await;

    if let Some(path) = &config.state_file {
        save_state(&sequencer, path)?;
    }
    tracing::info!(
        claims = sequencer.engine().registry().len(),
        "assize daemon exited cleanly"
    );
    Ok(())
}

fn load_engine(config: &DaemonConfig) -> anyhow::Result<AdjudicationEngine> {
    if let Some(path) = &config.state_file {
        if path.exists() {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading state file {}", path.display()))?;
            let engine = AdjudicationEngine::decode(&bytes)
                .with_context(|| format!("decoding state file {}", path.display()))?;
            if engine.params() != &config.params {
                tracing::warn!("state file parameters differ from config; using the state file's");
            }
            tracing::info!(path = %path.display(), "state restored");
            return Ok(engine);
        }
    }
    Ok(AdjudicationEngine::new(config.params.clone())?)
}

fn save_state(sequencer: &Sequencer, path: &Path) -> anyhow::Result<()> {
    let bytes = sequencer.encode_state()?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "state saved");
    Ok(())
}
