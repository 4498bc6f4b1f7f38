use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntropyError {
    #[error("entropy not yet available: {0}")]
    Unavailable(String),

    #[error("verification failed: {0}")]
    VerificationFailed(String),

    #[error("commit-reveal: {0}")]
    CommitReveal(String),
}
