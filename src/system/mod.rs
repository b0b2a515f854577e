//! Process-level setup shared by the binary and embedders.

pub mod logging;

pub use logging::init_logging;
