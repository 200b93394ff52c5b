//! Report rendering and delivery to the configured outputs.
mod format;
mod writers;

#[cfg(test)]
mod tests;

pub use format::render_report;
pub use writers::write_outputs;
