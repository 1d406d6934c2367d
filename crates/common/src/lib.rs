pub mod canonicalize;
pub mod config;
pub mod fingerprint;
pub mod telemetry;
