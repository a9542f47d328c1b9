//! Telldus Sim - simulated telldusd event socket for testing consumers

pub mod config;
pub mod emitter;
pub mod error;
pub mod event;
pub mod utils;

pub use config::Config;
pub use emitter::EventEmitter;
pub use event::DeviceEvent;
