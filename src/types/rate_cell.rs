use crate::types::buckets::{ElevationBucket, WeekOfYear};
use crate::types::color::HexColor;
use std::collections::BTreeMap;

/// The occurrence rate of one category in one (week, elevation band) group.
#[derive(Debug, PartialEq, Clone)]
pub struct RateCell {
    pub week: WeekOfYear,
    pub elevation: ElevationBucket,
    pub category: String,
    pub count: u32,
    /// `count` divided by the group's total count; 0 for empty groups.
    pub rate: f64,
}

/// Seasonal rates of one feature, ready to be faceted by elevation band and
/// stacked by category.
///
/// Cells are ordered by elevation band, then week, then descending rate with
/// ties broken by category name.
#[derive(Debug, PartialEq, Clone)]
pub struct SeasonalRates {
    pub(crate) feature: String,
    pub(crate) baseline: String,
    pub(crate) cells: Vec<RateCell>,
    pub(crate) colors: BTreeMap<String, HexColor>,
}

impl SeasonalRates {
    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn cells(&self) -> &[RateCell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<RateCell> {
        self.cells
    }

    /// Palette colour assigned to each category in the output.
    pub fn colors(&self) -> &BTreeMap<String, HexColor> {
        &self.colors
    }

    pub fn color_for(&self, category: &str) -> Option<HexColor> {
        self.colors.get(category).copied()
    }

    /// Categories present in the output, in lexical order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }

    /// Elevation bands present in the output, lowest first.
    pub fn elevation_buckets(&self) -> Vec<ElevationBucket> {
        let mut buckets: Vec<ElevationBucket> = self.cells.iter().map(|c| c.elevation).collect();
        buckets.dedup();
        buckets
    }

    /// Groups the cells by elevation band, one facet per band.
    pub fn by_elevation(&self) -> BTreeMap<ElevationBucket, Vec<&RateCell>> {
        let mut facets: BTreeMap<ElevationBucket, Vec<&RateCell>> = BTreeMap::new();
        for cell in &self.cells {
            facets.entry(cell.elevation).or_default().push(cell);
        }
        facets
    }

    /// Finds the cell for a (week, band, category) combination.
    pub fn get(
        &self,
        week: WeekOfYear,
        elevation: ElevationBucket,
        category: &str,
    ) -> Option<&RateCell> {
        self.cells
            .iter()
            .find(|c| c.week == week && c.elevation == elevation && c.category == category)
    }
}
