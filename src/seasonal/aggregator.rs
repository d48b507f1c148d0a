//! Seasonal occurrence rates of a trip-report condition, stratified by week of
//! year and peak-elevation band.
//!
//! The aggregation counts each (elevation band, week, category) combination
//! and divides each count by its (band, week) group total. Every combination
//! of an observed band, one of the 52 weeks and an observed category is
//! present in the result, with count and rate 0 where nothing was reported.

use crate::seasonal::error::SeasonalRateError;
use crate::types::buckets::{ElevationBucket, WeekOfYear};
use crate::types::color::{HexColor, DEFAULT_PALETTE};
use crate::types::feature::Feature;
use crate::types::observation::Observation;
use crate::types::rate_cell::{RateCell, SeasonalRates};
use bon::bon;
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Observations above this peak elevation (feet) are left out by default.
pub const DEFAULT_ELEVATION_CEILING: f64 = 8000.0;
/// Default width (feet) of an elevation band.
pub const DEFAULT_ELEVATION_STEP: f64 = 2000.0;

type GridKey<'a> = (ElevationBucket, WeekOfYear, &'a str);

/// Computes per-week, per-elevation-band occurrence rates of a categorical feature.
///
/// An aggregator holds the binning settings and the colour palette; it is
/// immutable and can be reused for any number of features.
///
/// # Examples
///
/// ```
/// use trailstats::{Observation, SeasonalRateAggregator, WeekOfYear, ElevationBucket};
/// use chrono::NaiveDate;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// let observations = vec![
///     Observation::new(date, "rattlesnake-ledge", 500.0, "Snow free"),
///     Observation::new(date, "rattlesnake-ledge", 500.0, "Some snow"),
///     Observation::new(date, "rattlesnake-ledge", 500.0, "Some snow"),
/// ];
///
/// let aggregator = SeasonalRateAggregator::builder()
///     .elevation_step(2000.0)
///     .elevation_ceiling(8000.0)
///     .build()?;
///
/// let rates = aggregator
///     .rates(&observations)
///     .feature("snow")
///     .baseline("Snow free")
///     .call()?;
///
/// let week_1 = WeekOfYear::new(1).unwrap();
/// let low = ElevationBucket::containing(0.0, 2000.0);
/// let cell = rates.get(week_1, low, "Some snow").unwrap();
/// assert!((cell.rate - 2.0 / 3.0).abs() < 1e-9);
/// assert!(rates.cells().iter().all(|c| c.category != "Snow free"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalRateAggregator {
    elevation_ceiling: f64,
    elevation_step: f64,
    palette: Vec<HexColor>,
}

impl Default for SeasonalRateAggregator {
    fn default() -> Self {
        Self {
            elevation_ceiling: DEFAULT_ELEVATION_CEILING,
            elevation_step: DEFAULT_ELEVATION_STEP,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

#[bon]
impl SeasonalRateAggregator {
    /// Creates an aggregator.
    ///
    /// # Arguments
    ///
    /// * `.elevation_ceiling(f64)`: Optional. Highest peak elevation (inclusive) that is counted. Defaults to `8000.0`.
    /// * `.elevation_step(f64)`: Optional. Width of an elevation band. Defaults to `2000.0`.
    /// * `.palette(Vec<HexColor>)`: Optional. Colours assigned to output categories. Defaults to [`DEFAULT_PALETTE`].
    ///
    /// # Errors
    ///
    /// Returns [`SeasonalRateError::InvalidConfiguration`] if the step is not a
    /// positive finite number, the ceiling is NaN, or the palette is empty.
    #[builder]
    pub fn new(
        elevation_ceiling: Option<f64>,
        elevation_step: Option<f64>,
        palette: Option<Vec<HexColor>>,
    ) -> Result<Self, SeasonalRateError> {
        let elevation_ceiling = elevation_ceiling.unwrap_or(DEFAULT_ELEVATION_CEILING);
        let elevation_step = elevation_step.unwrap_or(DEFAULT_ELEVATION_STEP);
        let palette = palette.unwrap_or_else(|| DEFAULT_PALETTE.to_vec());

        if !elevation_step.is_finite() || elevation_step <= 0.0 {
            return Err(SeasonalRateError::InvalidConfiguration(format!(
                "elevation step must be a positive number, got {}",
                elevation_step
            )));
        }
        if elevation_ceiling.is_nan() {
            return Err(SeasonalRateError::InvalidConfiguration(
                "elevation ceiling is NaN".to_string(),
            ));
        }
        if palette.is_empty() {
            return Err(SeasonalRateError::InvalidConfiguration(
                "colour palette is empty".to_string(),
            ));
        }

        Ok(Self {
            elevation_ceiling,
            elevation_step,
            palette,
        })
    }

    pub fn elevation_ceiling(&self) -> f64 {
        self.elevation_ceiling
    }

    pub fn elevation_step(&self) -> f64 {
        self.elevation_step
    }

    pub fn palette(&self) -> &[HexColor] {
        &self.palette
    }

    /// Computes the seasonal rates of one feature, leaving out its baseline category.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `observations`: **Required** start argument. The observations of the feature.
    /// * `.feature(&str)`: **Required.** Name of the feature, used for labelling and errors.
    /// * `.baseline(&str)`: **Required.** The "nothing notable" category to drop from the output.
    ///
    /// # Returns
    ///
    /// [`SeasonalRates`] holding, for every elevation band present after filtering,
    /// all 52 weeks of every non-baseline category.
    ///
    /// # Errors
    ///
    /// * [`SeasonalRateError::EmptyInput`]: no observations remain after elevation filtering.
    /// * [`SeasonalRateError::InvalidConfiguration`]: the ceiling lies below every observed elevation.
    #[builder(start_fn = rates)]
    #[doc(hidden)]
    pub fn build_rates(
        &self,
        #[builder(start_fn)] observations: &[Observation],
        feature: &str,
        baseline: &str,
    ) -> Result<SeasonalRates, SeasonalRateError> {
        let mut cells: Vec<RateCell> = self
            .rate_grid(observations, feature)?
            .into_iter()
            .filter(|cell| cell.category != baseline)
            .collect();

        cells.sort_by(|a, b| {
            a.elevation
                .cmp(&b.elevation)
                .then(a.week.cmp(&b.week))
                .then(b.rate.total_cmp(&a.rate))
                .then_with(|| a.category.cmp(&b.category))
        });

        let categories: BTreeSet<&str> = cells.iter().map(|c| c.category.as_str()).collect();
        let colors: BTreeMap<String, HexColor> = categories
            .into_iter()
            .zip(self.palette.iter().cycle())
            .map(|(category, color)| (category.to_string(), *color))
            .collect();

        info!(
            "Computed {} seasonal rate cells for '{}' ({} categories besides '{}')",
            cells.len(),
            feature,
            colors.len(),
            baseline
        );

        Ok(SeasonalRates {
            feature: feature.to_string(),
            baseline: baseline.to_string(),
            cells,
            colors,
        })
    }

    /// Computes the seasonal rates of a catalogue [`Feature`], dropping its
    /// standard baseline.
    pub fn rates_for(
        &self,
        observations: &[Observation],
        feature: Feature,
    ) -> Result<SeasonalRates, SeasonalRateError> {
        let rates = self
            .rates(observations)
            .feature(feature.column_name())
            .baseline(feature.baseline())
            .call()?;
        Ok(rates)
    }

    /// Computes the zero-filled rate grid with every category, baseline included.
    ///
    /// Cells are ordered by elevation band, week and category name. Within each
    /// (band, week) group that has observations, the rates sum to 1.
    pub fn rate_grid(
        &self,
        observations: &[Observation],
        feature: &str,
    ) -> Result<Vec<RateCell>, SeasonalRateError> {
        let empty = || SeasonalRateError::EmptyInput {
            feature: feature.to_string(),
        };

        let min_elevation = observations
            .iter()
            .map(|o| o.peak_elevation)
            .filter(|e| !e.is_nan())
            .min_by(f64::total_cmp)
            .ok_or_else(empty)?;
        if self.elevation_ceiling < min_elevation {
            return Err(SeasonalRateError::InvalidConfiguration(format!(
                "elevation ceiling {} is below the lowest observed elevation {} for '{}'",
                self.elevation_ceiling, min_elevation, feature
            )));
        }

        let keyed: Vec<GridKey> = observations
            .iter()
            .filter(|o| o.peak_elevation <= self.elevation_ceiling)
            .map(|o| {
                (
                    ElevationBucket::containing(o.peak_elevation, self.elevation_step),
                    WeekOfYear::from_date(o.date),
                    o.category.as_str(),
                )
            })
            .collect();

        let dropped = observations.len() - keyed.len();
        if dropped > 0 {
            warn!(
                "Dropped {} of {} '{}' observations above {} ft or without elevation",
                dropped,
                observations.len(),
                feature,
                self.elevation_ceiling
            );
        }
        if keyed.is_empty() {
            return Err(empty());
        }

        let buckets: BTreeSet<ElevationBucket> = keyed.iter().map(|k| k.0).collect();
        let categories: BTreeSet<&str> = keyed.iter().map(|k| k.2).collect();
        debug!(
            "'{}': {} elevation bands x {} weeks x {} categories",
            feature,
            buckets.len(),
            WeekOfYear::all().count(),
            categories.len()
        );

        let mut grid: BTreeMap<GridKey, u32> = BTreeMap::new();
        for &bucket in &buckets {
            for week in WeekOfYear::all() {
                for &category in &categories {
                    grid.insert((bucket, week, category), 0);
                }
            }
        }
        for key in keyed {
            *grid.entry(key).or_insert(0) += 1;
        }

        let mut totals: BTreeMap<(ElevationBucket, WeekOfYear), u32> = BTreeMap::new();
        for (&(bucket, week, _), &count) in &grid {
            *totals.entry((bucket, week)).or_insert(0) += count;
        }

        let cells = grid
            .into_iter()
            .map(|((elevation, week, category), count)| {
                let total = totals.get(&(elevation, week)).copied().unwrap_or(0);
                // Weeks without any report in this band stay at 0.
                let rate = if total == 0 {
                    0.0
                } else {
                    f64::from(count) / f64::from(total)
                };
                RateCell {
                    week,
                    elevation,
                    category: category.to_string(),
                    count,
                    rate,
                }
            })
            .collect();

        Ok(cells)
    }
}

/// Computes seasonal rates in one call.
///
/// Equivalent to building a [`SeasonalRateAggregator`] from `elevation_ceiling`,
/// `elevation_step` and `palette`, then calling
/// [`SeasonalRateAggregator::rates`] with `feature` and `baseline`.
pub fn compute_seasonal_rates(
    observations: &[Observation],
    feature: &str,
    baseline: &str,
    elevation_ceiling: f64,
    elevation_step: f64,
    palette: &[HexColor],
) -> Result<SeasonalRates, SeasonalRateError> {
    let aggregator = SeasonalRateAggregator::builder()
        .elevation_ceiling(elevation_ceiling)
        .elevation_step(elevation_step)
        .palette(palette.to_vec())
        .build()?;
    let rates = aggregator
        .rates(observations)
        .feature(feature)
        .baseline(baseline)
        .call()?;
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    const TOLERANCE: f64 = 1e-9;

    fn in_week(week: u32) -> NaiveDate {
        NaiveDate::from_isoywd_opt(2024, week, Weekday::Wed).unwrap()
    }

    fn obs(week: u32, elevation: f64, category: &str) -> Observation {
        Observation::new(in_week(week), "hike", elevation, category)
    }

    fn snow_observations() -> Vec<Observation> {
        vec![
            obs(1, 500.0, "Snow free"),
            obs(1, 500.0, "Some snow"),
            obs(1, 500.0, "Some snow"),
            obs(1, 4500.0, "Significant snow"),
            obs(1, 4500.0, "Some snow"),
            obs(10, 4500.0, "Significant snow"),
            obs(25, 2500.0, "Snow free"),
            obs(25, 2500.0, "Snow free"),
            obs(25, 2500.0, "Some snow"),
            obs(40, 7900.0, "Significant snow"),
            obs(40, 7900.0, "Snow free"),
        ]
    }

    fn snow_rates(observations: &[Observation]) -> Result<SeasonalRates, SeasonalRateError> {
        SeasonalRateAggregator::default().rates_for(observations, Feature::Snow)
    }

    #[test]
    fn test_three_observation_example() -> Result<(), Box<dyn std::error::Error>> {
        let observations = vec![
            obs(1, 500.0, "Snow free"),
            obs(1, 500.0, "Some snow"),
            obs(1, 500.0, "Some snow"),
        ];
        let rates = compute_seasonal_rates(
            &observations,
            "snow",
            "Snow free",
            8000.0,
            2000.0,
            &DEFAULT_PALETTE,
        )?;

        let low = ElevationBucket::containing(0.0, 2000.0);
        assert_eq!(low.label(), "0k–2k");
        let week_1 = WeekOfYear::new(1).unwrap();

        let cell = rates.get(week_1, low, "Some snow").unwrap();
        assert_eq!(cell.count, 2);
        assert!((cell.rate - 0.667).abs() < 1e-3);

        assert!(rates.cells().iter().all(|c| c.category != "Snow free"));
        assert_eq!(rates.cells().len(), 52);
        for cell in rates.cells().iter().filter(|c| c.week != week_1) {
            assert_eq!(cell.rate, 0.0);
            assert_eq!(cell.count, 0);
        }
        Ok(())
    }

    #[test]
    fn test_rates_sum_to_one_with_baseline() -> Result<(), SeasonalRateError> {
        let grid = SeasonalRateAggregator::default().rate_grid(&snow_observations(), "snow")?;

        let mut groups: BTreeMap<(ElevationBucket, WeekOfYear), (u32, f64)> = BTreeMap::new();
        for cell in &grid {
            let entry = groups.entry((cell.elevation, cell.week)).or_insert((0, 0.0));
            entry.0 += cell.count;
            entry.1 += cell.rate;
        }

        let mut populated = 0;
        for ((bucket, week), (total, rate_sum)) in groups {
            if total > 0 {
                populated += 1;
                assert!(
                    (rate_sum - 1.0).abs() < TOLERANCE,
                    "Rates for {} {} sum to {}",
                    bucket,
                    week,
                    rate_sum
                );
            } else {
                assert_eq!(rate_sum, 0.0);
            }
        }
        assert_eq!(populated, 5);
        Ok(())
    }

    #[test]
    fn test_rates_within_unit_interval() -> Result<(), SeasonalRateError> {
        let rates = snow_rates(&snow_observations())?;
        assert!(rates.cells().iter().all(|c| (0.0..=1.0).contains(&c.rate)));

        let mut sums: BTreeMap<(ElevationBucket, WeekOfYear), f64> = BTreeMap::new();
        for cell in rates.cells() {
            *sums.entry((cell.elevation, cell.week)).or_insert(0.0) += cell.rate;
        }
        assert!(sums.values().all(|s| *s <= 1.0 + TOLERANCE));
        Ok(())
    }

    #[test]
    fn test_zero_fill_covers_every_week_and_bucket() -> Result<(), SeasonalRateError> {
        let rates = snow_rates(&snow_observations())?;
        let facets = rates.by_elevation();

        // 0k-2k, 2k-4k, 4k-6k, 6k-8k
        assert_eq!(facets.len(), 4);
        let categories: Vec<&str> = rates.categories().collect();
        assert_eq!(categories, vec!["Significant snow", "Some snow"]);

        for (bucket, cells) in facets {
            assert_eq!(cells.len(), 52 * categories.len(), "bucket {}", bucket);
            for week in WeekOfYear::all() {
                for category in &categories {
                    assert!(rates.get(week, bucket, category).is_some());
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_category_absent_from_a_bucket_is_zero_filled() -> Result<(), SeasonalRateError> {
        let rates = snow_rates(&snow_observations())?;
        let low = ElevationBucket::containing(500.0, 2000.0);
        let week_1 = WeekOfYear::new(1).unwrap();

        // No "Significant snow" was ever reported below 2000 ft
        let cell = rates.get(week_1, low, "Significant snow").unwrap();
        assert_eq!(cell.count, 0);
        assert_eq!(cell.rate, 0.0);
        Ok(())
    }

    #[test]
    fn test_idempotent() -> Result<(), SeasonalRateError> {
        let observations = snow_observations();
        let aggregator = SeasonalRateAggregator::default();
        let first = aggregator.rates_for(&observations, Feature::Snow)?;
        let second = aggregator.rates_for(&observations, Feature::Snow)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_bucket_edge_goes_up() -> Result<(), SeasonalRateError> {
        let observations = vec![obs(5, 2000.0, "Some snow")];
        let rates = snow_rates(&observations)?;
        let buckets = rates.elevation_buckets();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].label(), "2k–4k");
        Ok(())
    }

    #[test]
    fn test_observations_above_ceiling_are_ignored() -> Result<(), SeasonalRateError> {
        let observations = vec![
            obs(3, 1000.0, "Snow free"),
            obs(3, 1000.0, "Some snow"),
            obs(3, 8000.0, "Some snow"),
            obs(3, 9500.0, "Significant snow"),
            obs(3, 1500.0, "Significant snow"),
        ];
        let aggregator = SeasonalRateAggregator::builder()
            .elevation_ceiling(8000.0)
            .build()?;
        let rates = aggregator.rates_for(&observations[..4], Feature::Snow)?;

        // The ceiling is inclusive, 9500 ft never shows up
        let labels: Vec<String> = rates.elevation_buckets().iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["0k–2k", "8k–10k"]);
        assert!(rates.cells().iter().all(|c| c.category != "Significant snow"));

        let week_3 = WeekOfYear::new(3).unwrap();
        let low = ElevationBucket::containing(1000.0, 2000.0);
        let cell = rates.get(week_3, low, "Some snow").unwrap();
        assert!((cell.rate - 0.5).abs() < TOLERANCE);

        // Adding a low "Significant snow" report changes only the low band's denominator
        let rates = aggregator.rates_for(&observations, Feature::Snow)?;
        let cell = rates.get(week_3, low, "Some snow").unwrap();
        assert!((cell.rate - 1.0 / 3.0).abs() < TOLERANCE);
        let high = ElevationBucket::containing(8000.0, 2000.0);
        let cell = rates.get(week_3, high, "Some snow").unwrap();
        assert!((cell.rate - 1.0).abs() < TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_order_descending_rate_then_category() -> Result<(), SeasonalRateError> {
        let observations = vec![
            obs(1, 100.0, "Some snow"),
            obs(1, 100.0, "Significant snow"),
            obs(1, 100.0, "Snow free"),
            obs(2, 100.0, "Some snow"),
            obs(2, 100.0, "Some snow"),
            obs(2, 100.0, "Significant snow"),
        ];
        let rates = snow_rates(&observations)?;
        let order: Vec<(u32, &str)> = rates
            .cells()
            .iter()
            .take(4)
            .map(|c| (c.week.get(), c.category.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (1, "Significant snow"),
                (1, "Some snow"),
                (2, "Some snow"),
                (2, "Significant snow"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_unknown_categories_pass_through() -> Result<(), SeasonalRateError> {
        let observations = vec![obs(20, 3000.0, "Snow free"), obs(20, 3000.0, "Avalanche debris")];
        let rates = snow_rates(&observations)?;
        let categories: Vec<&str> = rates.categories().collect();
        assert_eq!(categories, vec!["Avalanche debris"]);
        Ok(())
    }

    #[test]
    fn test_only_baseline_observed() -> Result<(), SeasonalRateError> {
        let observations = vec![obs(20, 3000.0, "Snow free")];
        let rates = snow_rates(&observations)?;
        assert!(rates.cells().is_empty());
        assert!(rates.colors().is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_step() {
        for step in [0.0, -2000.0, f64::NAN, f64::INFINITY] {
            let result = SeasonalRateAggregator::builder().elevation_step(step).build();
            assert!(
                matches!(result, Err(SeasonalRateError::InvalidConfiguration(_))),
                "step {} should be rejected",
                step
            );
        }
    }

    #[test]
    fn test_empty_palette_rejected() {
        let result = SeasonalRateAggregator::builder().palette(Vec::new()).build();
        assert!(matches!(result, Err(SeasonalRateError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_ceiling_below_lowest_elevation() {
        let observations = vec![obs(1, 3000.0, "Some snow"), obs(2, 4000.0, "Snow free")];
        let result = compute_seasonal_rates(
            &observations,
            "snow",
            "Snow free",
            2000.0,
            2000.0,
            &DEFAULT_PALETTE,
        );
        assert!(matches!(result, Err(SeasonalRateError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_empty_input() {
        let result = snow_rates(&[]);
        assert_eq!(
            result,
            Err(SeasonalRateError::EmptyInput {
                feature: "snow".to_string()
            })
        );

        let result = snow_rates(&[obs(1, f64::NAN, "Some snow")]);
        assert!(matches!(result, Err(SeasonalRateError::EmptyInput { .. })));
    }

    #[test]
    fn test_palette_cycles_over_categories() -> Result<(), SeasonalRateError> {
        let red = HexColor(255, 0, 0);
        let blue = HexColor(0, 0, 255);
        let aggregator = SeasonalRateAggregator::builder()
            .palette(vec![red, blue])
            .build()?;
        let observations = vec![
            obs(30, 3000.0, "Bugs were a nuisance"),
            obs(30, 3000.0, "Bugs were annoying"),
            obs(30, 3000.0, "Bugs were biblical"),
            obs(30, 3000.0, "No bugs"),
        ];
        let rates = aggregator.rates_for(&observations, Feature::Bugs)?;
        assert_eq!(rates.color_for("Bugs were a nuisance"), Some(red));
        assert_eq!(rates.color_for("Bugs were annoying"), Some(blue));
        assert_eq!(rates.color_for("Bugs were biblical"), Some(red));
        assert_eq!(rates.color_for("No bugs"), None);
        Ok(())
    }
}
