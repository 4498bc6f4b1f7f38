use assize_adjudication::AdjudicationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("engine error: {0}")]
    Engine(#[from] AdjudicationError),
}
