//! Latency aggregation over completed correlation pairs.
mod engine;
mod types;

#[cfg(test)]
mod tests;

pub use engine::compute_metrics;
pub use types::RunMetrics;
