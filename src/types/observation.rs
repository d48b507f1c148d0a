use chrono::NaiveDate;

/// One condition record from a trip report, tied to the hike's peak elevation.
///
/// `category` holds the value of a single feature column, e.g. `"Some snow"`
/// for [`crate::Feature::Snow`]. Values outside the expected domain are kept
/// as-is.
#[derive(Debug, PartialEq, Clone)]
pub struct Observation {
    pub date: NaiveDate,
    pub hike_id: String,
    pub peak_elevation: f64, // feet
    pub category: String,
}

impl Observation {
    pub fn new(
        date: NaiveDate,
        hike_id: impl Into<String>,
        peak_elevation: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            hike_id: hike_id.into(),
            peak_elevation,
            category: category.into(),
        }
    }
}
