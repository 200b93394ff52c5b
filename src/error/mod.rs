mod app;
mod config;
mod firer;
mod receiver;
mod sink;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use firer::FirerError;
pub use receiver::ReceiverError;
pub use sink::SinkError;
