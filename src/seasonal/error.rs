use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SeasonalRateError {
    #[error("Invalid aggregation settings: {0}")]
    InvalidConfiguration(String),

    #[error("No observations of '{feature}' left after elevation filtering")]
    EmptyInput { feature: String },
}
