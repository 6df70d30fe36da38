pub mod config;
pub mod logger;
pub mod severity;
pub mod writer;

pub use config::LineFormat;
pub use logger::Logger;
pub use severity::Severity;
