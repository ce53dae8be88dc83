pub mod encoding;
pub mod tracing;
