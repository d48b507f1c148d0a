use crate::dataset::error::DatasetError;
use crate::seasonal::error::SeasonalRateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrailStatsError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    SeasonalRate(#[from] SeasonalRateError),
}
