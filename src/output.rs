//! Renderer-facing shapes of [`SeasonalRates`]: a long frame with one row per
//! cell, a wide frame per elevation band, and flat serde records.

use crate::types::buckets::{ElevationBucket, WeekOfYear, WEEKS_PER_YEAR};
use crate::types::color::HexColor;
use crate::types::rate_cell::SeasonalRates;
use polars::prelude::*;
use serde::Serialize;

/// One rate cell flattened for a renderer: x = `week`, y = `rate`,
/// fill = `category`, facet = `elevation_bucket`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RateRecord {
    pub week: u32,
    pub elevation_bucket: String,
    pub category: String,
    pub count: u32,
    pub rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
}

impl SeasonalRates {
    /// Flattens the cells into [`RateRecord`]s, keeping the output order.
    pub fn records(&self) -> Vec<RateRecord> {
        self.cells
            .iter()
            .map(|cell| RateRecord {
                week: cell.week.get(),
                elevation_bucket: cell.elevation.label(),
                category: cell.category.clone(),
                count: cell.count,
                rate: cell.rate,
                color: self.color_for(&cell.category),
            })
            .collect()
    }

    /// Serializes [`Self::records`] as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records())
    }

    /// Builds a long `DataFrame` with one row per cell.
    ///
    /// Columns: `week` (u32), `elevation_bucket` (str), `elevation_lower` (f64),
    /// `category` (str), `count` (u32), `rate` (f64).
    ///
    /// # Examples
    ///
    /// ```
    /// use trailstats::{Feature, Observation, SeasonalRateAggregator};
    /// use chrono::NaiveDate;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let date = NaiveDate::from_ymd_opt(2023, 7, 12).unwrap();
    /// let observations = vec![
    ///     Observation::new(date, "42", 5400.0, "Bugs were annoying"),
    ///     Observation::new(date, "42", 5400.0, "No bugs"),
    /// ];
    /// let rates = SeasonalRateAggregator::default().rates_for(&observations, Feature::Bugs)?;
    ///
    /// let frame = rates.to_frame()?;
    /// assert_eq!(frame.height(), 52);
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let weeks: Vec<u32> = self.cells.iter().map(|c| c.week.get()).collect();
        let buckets: Vec<String> = self.cells.iter().map(|c| c.elevation.label()).collect();
        let lowers: Vec<f64> = self.cells.iter().map(|c| c.elevation.lower()).collect();
        let categories: Vec<&str> = self.cells.iter().map(|c| c.category.as_str()).collect();
        let counts: Vec<u32> = self.cells.iter().map(|c| c.count).collect();
        let rates: Vec<f64> = self.cells.iter().map(|c| c.rate).collect();

        df!(
            "week" => weeks,
            "elevation_bucket" => buckets,
            "elevation_lower" => lowers,
            "category" => categories,
            "count" => counts,
            "rate" => rates
        )
    }

    /// Builds a wide `DataFrame` for one elevation band: a `week` column with
    /// all 52 weeks, then one rate column per category in lexical order.
    ///
    /// A band that is absent from the output yields all-zero rate columns.
    pub fn to_wide_frame(&self, bucket: &ElevationBucket) -> PolarsResult<DataFrame> {
        let weeks: Vec<u32> = WeekOfYear::all().map(WeekOfYear::get).collect();
        let mut columns = vec![Column::new("week".into(), weeks)];

        for category in self.categories() {
            let mut rates = vec![0.0f64; WEEKS_PER_YEAR as usize];
            for cell in self
                .cells
                .iter()
                .filter(|c| c.elevation == *bucket && c.category == category)
            {
                rates[(cell.week.get() - 1) as usize] = cell.rate;
            }
            columns.push(Column::new(category.into(), rates));
        }

        DataFrame::new(columns)
    }
}
