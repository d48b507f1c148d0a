pub mod buckets;
pub mod color;
pub mod feature;
pub mod observation;
pub mod rate_cell;
