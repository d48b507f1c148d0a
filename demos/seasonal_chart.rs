//! demos/seasonal_chart.rs
//!
//! Loads the hikes and trip-report tables, computes the seasonal rate of every
//! trail condition and plots one chart per condition and elevation band.
//!
//! To run this demo:
//! cargo run --example seasonal_chart --features examples -- data/hikes.csv data/reports.csv

use std::env;
use std::error::Error;

use plotlars::{Legend, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::DataFrame;
use trailstats::{
    Feature, SeasonalRateAggregator, SeasonalRateError, SeasonalRates, TrailDataset,
    TrailStatsError,
};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let hikes_path = args.next().unwrap_or_else(|| "data/hikes.csv".to_string());
    let reports_path = args.next().unwrap_or_else(|| "data/reports.csv".to_string());

    let dataset = TrailDataset::load(&hikes_path, &reports_path)?;
    let aggregator = SeasonalRateAggregator::builder()
        .elevation_ceiling(8000.0)
        .elevation_step(2000.0)
        .build()?;

    for feature in Feature::ALL {
        let rates = match dataset.seasonal_rates(feature, &aggregator) {
            Ok(rates) => rates,
            // Nothing to chart for this condition
            Err(TrailStatsError::SeasonalRate(SeasonalRateError::EmptyInput { .. })) => {
                println!("No {} reports below the ceiling, skipping.", feature);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        for bucket in rates.elevation_buckets() {
            let frame = rates.to_wide_frame(&bucket)?;
            plot_rates(&frame, &rates, &format!("{} at {}", feature, bucket))?;
        }
    }

    Ok(())
}

/// Plots every category column of a wide rate frame against the week column.
fn plot_rates(data: &DataFrame, rates: &SeasonalRates, title: &str) -> Result<(), Box<dyn Error>> {
    let categories: Vec<&str> = rates.categories().collect();
    let Some((first, rest)) = categories.split_first() else {
        return Ok(());
    };
    let colors: Vec<Rgb> = categories
        .iter()
        .filter_map(|c| rates.color_for(c))
        .map(|c| Rgb(c.0, c.1, c.2))
        .collect();

    TimeSeriesPlot::builder()
        .data(data)
        .x("week")
        .y(*first)
        .additional_series(rest.to_vec())
        .colors(colors)
        .plot_title(Text::from(title).size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("Week of year")
        .y_title("Share of reports")
        .build()
        .plot();
    Ok(())
}
