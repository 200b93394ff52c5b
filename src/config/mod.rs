//! Configuration loading, validation, and scaffolding.
mod loader;
mod scaffold;
pub mod types;
mod validate;


pub use loader::load_config;
pub use scaffold::write_starter_config;
pub use validate::{TestPlan, validate_config};

/// Applied during validation when `test.timeout` is absent or zero.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Local receiver port when the config leaves `receiver.port` unset.
pub const DEFAULT_RECEIVER_PORT: u16 = 8081;
