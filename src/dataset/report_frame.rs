//! Contains the `ReportLazyFrame` structure for lazy operations on trip reports
//! joined with their hike's peak elevation.

use crate::dataset::error::DatasetError;
use crate::dataset::extractor::extract_observations;
use crate::types::feature::Feature;
use crate::types::observation::Observation;
use log::info;
use polars::prelude::{col, DataType, Expr, LazyFrame};

/// Column holding the selected feature's values after [`ReportLazyFrame::with_category`].
pub const CATEGORY_COLUMN: &str = "category";

/// A wrapper around a Polars `LazyFrame` of trip reports.
///
/// Every row carries the report columns plus a `peak_elevation` (f64, feet)
/// taken from the reported hike. Instances are obtained via
/// [`crate::TrailDataset::reports`].
///
/// # Errors
///
/// Operations that trigger computation on the underlying `LazyFrame` can
/// return a [`polars::prelude::PolarsError`], wrapped in [`DatasetError`]
/// by the methods of this type.
#[derive(Clone)]
pub struct ReportLazyFrame {
    /// The underlying Polars LazyFrame containing the joined reports.
    pub frame: LazyFrame,
}

impl ReportLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Filters the reports based on a Polars predicate expression.
    ///
    /// Returns a *new* `ReportLazyFrame` with the filter applied lazily.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use trailstats::{Feature, TrailDataset};
    /// use polars::prelude::{col, lit};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dataset = TrailDataset::load("data/hikes.csv", "data/reports.csv")?;
    ///
    /// // Only reports that other hikers marked as helpful
    /// let helpful = dataset.reports().filter(col("helpful").gt(lit(0)));
    /// let observations = helpful.observations(Feature::Snow)?;
    /// println!("{} helpful snow reports", observations.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> ReportLazyFrame {
        ReportLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Narrows the reports to the columns an [`Observation`] needs.
    ///
    /// Keeps `date`, `hike_id`, `peak_elevation` and the values of `column`
    /// (cast to string) as [`CATEGORY_COLUMN`], dropping rows where any of
    /// them is null.
    pub fn with_category(&self, column: &str) -> ReportLazyFrame {
        let frame = self
            .frame
            .clone()
            .filter(
                col("date")
                    .is_not_null()
                    .and(col("peak_elevation").is_not_null())
                    .and(col(column).is_not_null()),
            )
            .select([
                col("date"),
                col("hike_id"),
                col("peak_elevation"),
                col(column).cast(DataType::String).alias(CATEGORY_COLUMN),
            ]);
        ReportLazyFrame::new(frame)
    }

    /// Collects the observations of a catalogue [`Feature`].
    pub fn observations(&self, feature: Feature) -> Result<Vec<Observation>, DatasetError> {
        self.column_observations(feature.column_name())
    }

    /// Collects the observations of an arbitrary categorical column.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingColumn`] if the reports have no `column`,
    /// or [`DatasetError::DataFrameProcessing`] if Polars fails to collect.
    pub fn column_observations(&self, column: &str) -> Result<Vec<Observation>, DatasetError> {
        let mut frame = self.frame.clone();
        let schema = frame.collect_schema()?;
        if !schema.contains(column) {
            return Err(DatasetError::MissingColumn {
                table: "reports".to_string(),
                column: column.to_string(),
            });
        }

        let df = self.with_category(column).frame.collect()?;
        let observations = extract_observations(&df)?;
        info!(
            "Collected {} '{}' observations from {} complete reports",
            observations.len(),
            column,
            df.height()
        );
        Ok(observations)
    }
}
