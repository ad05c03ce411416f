//! Core library: folder scanning, page extraction, classification and record assembly.

pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod rules;
pub mod scanner;

pub use error::SyncError;
