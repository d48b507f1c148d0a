//! Time and elevation buckets used to stratify trip-report conditions.

use chrono::{Datelike, NaiveDate};
use ordered_float::OrderedFloat;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Number of week buckets in a season. ISO week 53 is folded into week 52.
pub const WEEKS_PER_YEAR: u32 = 52;

/// A week-of-year bucket in the range `1..=52`.
///
/// Derived from the ISO week of a date. Years with an ISO week 53 report that
/// week as 52, so every year maps onto the same 52 buckets.
///
/// # Examples
///
/// ```
/// use trailstats::WeekOfYear;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// assert_eq!(WeekOfYear::from_date(date).get(), 1);
///
/// // 2020-12-31 is in ISO week 53
/// let date = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
/// assert_eq!(WeekOfYear::from_date(date).get(), 52);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct WeekOfYear(u32);

impl WeekOfYear {
    /// Returns the bucket for `week`, or `None` when it lies outside `1..=52`.
    pub fn new(week: u32) -> Option<Self> {
        (1..=WEEKS_PER_YEAR).contains(&week).then_some(Self(week))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.iso_week().week().min(WEEKS_PER_YEAR))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// All 52 buckets in order.
    pub fn all() -> impl Iterator<Item = WeekOfYear> {
        (1..=WEEKS_PER_YEAR).map(WeekOfYear)
    }
}

impl Display for WeekOfYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "W{:02}", self.0)
    }
}

/// A half-open elevation band `[lower, upper)` in feet.
///
/// Bands are ordered by their lower edge. The label renders both edges in
/// thousands of feet, e.g. `0k–2k` for `[0, 2000)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct ElevationBucket {
    lower: OrderedFloat<f64>,
    upper: OrderedFloat<f64>,
}

impl ElevationBucket {
    /// Assigns `elevation` to its band of width `step`.
    ///
    /// The caller guarantees `step > 0`. An elevation exactly on an edge belongs
    /// to the band starting at that edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use trailstats::ElevationBucket;
    ///
    /// let bucket = ElevationBucket::containing(2000.0, 2000.0);
    /// assert_eq!(bucket.lower(), 2000.0);
    /// assert_eq!(bucket.label(), "2k–4k");
    /// ```
    pub fn containing(elevation: f64, step: f64) -> Self {
        let lower = (elevation / step).floor() * step;
        Self {
            lower: OrderedFloat(lower),
            upper: OrderedFloat(lower + step),
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower.into_inner()
    }

    pub fn upper(&self) -> f64 {
        self.upper.into_inner()
    }

    pub fn contains(&self, elevation: f64) -> bool {
        elevation >= self.lower() && elevation < self.upper()
    }

    pub fn label(&self) -> String {
        format!("{}k–{}k", self.lower() / 1000.0, self.upper() / 1000.0)
    }
}

impl Display for ElevationBucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
