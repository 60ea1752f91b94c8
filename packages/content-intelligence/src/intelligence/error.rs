#[derive(Debug, thiserror::Error)]
pub enum IntelligenceError {
    #[error("invalid time budget: {0} minutes")]
    InvalidTimeBudget(i32),
    #[error("invalid observation: {0}")]
    InvalidObservation(String),
    #[error("data source error: {0}")]
    DataSource(String),
}
