pub mod client;
pub mod error;

pub use client::AnalyzerClient;
pub use error::AnalyzerError;
