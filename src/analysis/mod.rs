pub mod alignment;
pub mod analyzer;
pub mod classifier;
