//! Loads the hikes and trip-report tables and joins them on the hike identifier.

use crate::dataset::error::DatasetError;
use crate::dataset::report_frame::ReportLazyFrame;
use crate::error::TrailStatsError;
use crate::seasonal::aggregator::SeasonalRateAggregator;
use crate::types::feature::Feature;
use crate::types::rate_cell::SeasonalRates;
use log::info;
use polars::prelude::*;
use std::path::Path;

const HIKE_COLUMNS: [&str; 2] = ["hike_id", "highest_point"];
const REPORT_COLUMNS: [&str; 2] = ["hike_id", "date"];

/// The two tables of the scraped trail dataset.
///
/// `hikes` holds one row per hike with at least `hike_id` and `highest_point`
/// (feet). `reports` holds one row per trip report with at least `hike_id`,
/// `date` and the condition columns named by [`Feature`].
///
/// `hike_id` is coerced to a string in both tables, `highest_point` to f64 and
/// `date` to a string; everything else keeps the type Polars inferred.
#[derive(Clone)]
pub struct TrailDataset {
    hikes: LazyFrame,
    reports: LazyFrame,
}

impl TrailDataset {
    /// Reads both tables from CSV files with a header row.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::CsvRead`] if a file cannot be opened or parsed.
    /// * [`DatasetError::MissingColumn`] if a required column is absent.
    pub fn load(
        hikes_path: impl AsRef<Path>,
        reports_path: impl AsRef<Path>,
    ) -> Result<Self, DatasetError> {
        let hikes = read_csv(hikes_path.as_ref())?;
        let reports = read_csv(reports_path.as_ref())?;
        Self::from_frames(hikes, reports)
    }

    /// Builds a dataset from already loaded frames.
    pub fn from_frames(hikes: DataFrame, reports: DataFrame) -> Result<Self, DatasetError> {
        ensure_columns(&hikes, "hikes", &HIKE_COLUMNS)?;
        ensure_columns(&reports, "reports", &REPORT_COLUMNS)?;
        info!(
            "Trail dataset with {} hikes and {} reports",
            hikes.height(),
            reports.height()
        );

        let hikes = hikes.lazy().with_columns([
            col("hike_id").cast(DataType::String),
            col("highest_point").cast(DataType::Float64),
        ]);
        let reports = reports.lazy().with_columns([
            col("hike_id").cast(DataType::String),
            col("date").cast(DataType::String),
        ]);
        Ok(Self { hikes, reports })
    }

    /// The hikes table after type coercion.
    pub fn hikes(&self) -> LazyFrame {
        self.hikes.clone()
    }

    /// Trip reports joined with the peak elevation of their hike.
    ///
    /// Reports whose hike is not in the hikes table are dropped by the inner join.
    pub fn reports(&self) -> ReportLazyFrame {
        let elevations = self
            .hikes
            .clone()
            .select([col("hike_id"), col("highest_point").alias("peak_elevation")]);
        let frame = self.reports.clone().join(
            elevations,
            [col("hike_id")],
            [col("hike_id")],
            JoinArgs::new(JoinType::Inner),
        );
        ReportLazyFrame::new(frame)
    }

    /// Loads the observations of `feature` and computes their seasonal rates.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use trailstats::{Feature, SeasonalRateAggregator, TrailDataset};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dataset = TrailDataset::load("data/hikes.csv", "data/reports.csv")?;
    /// let aggregator = SeasonalRateAggregator::default();
    ///
    /// for feature in Feature::ALL {
    ///     let rates = dataset.seasonal_rates(feature, &aggregator)?;
    ///     println!("{}: {} cells", feature, rates.cells().len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn seasonal_rates(
        &self,
        feature: Feature,
        aggregator: &SeasonalRateAggregator,
    ) -> Result<SeasonalRates, TrailStatsError> {
        let observations = self.reports().observations(feature)?;
        Ok(aggregator.rates_for(&observations, feature)?)
    }
}

fn read_csv(path: &Path) -> Result<DataFrame, DatasetError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| DatasetError::CsvRead(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| DatasetError::CsvRead(path.to_path_buf(), e))?;
    info!("Read {} rows from {:?}", df.height(), path);
    Ok(df)
}

fn ensure_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<(), DatasetError> {
    let names = df.get_column_names();
    for column in required {
        if !names.iter().any(|name| name.as_str() == *column) {
            return Err(DatasetError::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}
