use crate::dataset::error::DatasetError;
use crate::dataset::report_frame::CATEGORY_COLUMN;
use crate::types::observation::Observation;
use chrono::NaiveDate;
use log::warn;
use polars::prelude::*;

// ISO dates, and the "Jul 14, 2019" style used on report pages
const REPORT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%b %d, %Y"];

pub(crate) fn parse_report_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    REPORT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Converts a collected report frame into observations.
///
/// Expects `date`, `hike_id` and `category` as strings and `peak_elevation` as f64.
/// Rows with a null in any of them, or with an unparseable date, are skipped.
pub(crate) fn extract_observations(df: &DataFrame) -> Result<Vec<Observation>, DatasetError> {
    macro_rules! get_column {
        ($df:expr, $name:expr) => {
            $df.column($name).map_err(|_| DatasetError::MissingColumn {
                table: "reports".to_string(),
                column: $name.to_string(),
            })?
        };
    }

    let dates = get_column!(df, "date").str()?;
    let hike_ids = get_column!(df, "hike_id").str()?;
    let elevations = get_column!(df, "peak_elevation").f64()?;
    let categories = get_column!(df, CATEGORY_COLUMN).str()?;

    let mut observations = Vec::with_capacity(df.height());
    let mut unparsed_dates = 0usize;

    let rows = dates
        .into_iter()
        .zip(hike_ids)
        .zip(elevations)
        .zip(categories);
    for (((date, hike_id), elevation), category) in rows {
        let (Some(date), Some(hike_id), Some(elevation), Some(category)) =
            (date, hike_id, elevation, category)
        else {
            continue;
        };
        match parse_report_date(date) {
            Some(date) => observations.push(Observation::new(date, hike_id, elevation, category)),
            None => unparsed_dates += 1,
        }
    }

    if unparsed_dates > 0 {
        warn!(
            "Skipped {} of {} reports with an unparseable date",
            unparsed_dates,
            df.height()
        );
    }
    Ok(observations)
}
