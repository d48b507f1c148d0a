//! Defines the condition columns of the trip-report table.

use std::fmt;

/// A categorical condition reported on a trip report.
///
/// Each feature maps to one column of the reports table and carries a
/// baseline value: the "nothing notable" state that seasonal charts leave out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Snow on the trail: "Snow free", "Some snow", "Significant snow".
    Snow,
    /// Insect activity: "No bugs", "Bugs were a nuisance", "Bugs were annoying".
    Bugs,
    /// Trail state, e.g. "Trail in good condition", "Overgrown in places".
    Trail,
    /// Access road state, e.g. "Road suitable for all vehicles", "High clearance vehicles only".
    Road,
    /// Whether ripe berries were reported, stored as a boolean flag.
    RipeBerries,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Snow,
        Feature::Bugs,
        Feature::Trail,
        Feature::Road,
        Feature::RipeBerries,
    ];

    /// Name of the column holding this feature in the reports table.
    pub fn column_name(&self) -> &'static str {
        match self {
            Feature::Snow => "snow",
            Feature::Bugs => "bugs",
            Feature::Trail => "trail",
            Feature::Road => "road",
            Feature::RipeBerries => "ripe_berries",
        }
    }

    /// The category excluded from seasonal rate output.
    pub fn baseline(&self) -> &'static str {
        match self {
            Feature::Snow => "Snow free",
            Feature::Bugs => "No bugs",
            Feature::Trail => "Trail in good condition",
            Feature::Road => "Road suitable for all vehicles",
            Feature::RipeBerries => "false",
        }
    }
}

/// Formats a `Feature` as its column name.
///
/// # Examples
///
/// ```
/// use trailstats::Feature;
///
/// assert_eq!(Feature::RipeBerries.to_string(), "ripe_berries");
/// ```
impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}
