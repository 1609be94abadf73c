//! Configuration module
//!
//! Handles the exporter configuration: metric name prefix, histogram bucket
//! bounds and the pull endpoint address.

mod defaults;
mod loading;
mod types;
mod validation;

pub use loading::{apply_env_overrides, apply_overrides_with, load_config, load_config_from_str};
pub use types::{MetricsConfig, ServerConfig};

// Re-export default functions for use in tests and other modules
pub use defaults::{latency_buckets, server_host, server_path, server_port, size_buckets};
