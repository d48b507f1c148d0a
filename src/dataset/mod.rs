pub mod error;
mod extractor;
pub mod loader;
pub mod report_frame;
