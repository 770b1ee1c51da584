//! Command implementations.

pub mod analyze;
pub mod archive;
pub mod config;
pub mod predictions;

pub use self::analyze::execute_analyze;
pub use self::archive::execute_archive;
pub use self::config::execute_config;
pub use self::predictions::execute_predictions;
