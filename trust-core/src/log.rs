//! Thin facade over the `log` crate. No sink/appender configuration lives
//! here: wiring an actual subscriber (file rotation, JSON formatting, ...) is
//! the embedding host's job, not the trust engine's.

#[allow(unused_imports)]
pub use log::{debug, error, info, trace, warn, Level, LevelFilter};
