mod dataset;
mod error;
mod output;
mod seasonal;
mod types;

pub use error::TrailStatsError;

pub use seasonal::aggregator::*;
pub use seasonal::error::SeasonalRateError;

pub use dataset::error::DatasetError;
pub use dataset::loader::TrailDataset;
pub use dataset::report_frame::{ReportLazyFrame, CATEGORY_COLUMN};

pub use output::RateRecord;

pub use types::buckets::{ElevationBucket, WeekOfYear, WEEKS_PER_YEAR};
pub use types::color::{HexColor, ParseHexColorError, DEFAULT_PALETTE};
pub use types::feature::Feature;
pub use types::observation::Observation;
pub use types::rate_cell::{RateCell, SeasonalRates};
