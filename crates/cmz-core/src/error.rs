use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Unknown model type: {0}")]
    UnknownModelType(String),

    #[error("Unknown stage label: {0}")]
    UnknownStage(String),
}
