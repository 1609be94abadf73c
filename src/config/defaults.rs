//! Default values for configuration fields
//!
//! This module centralizes all default value functions used in serde deserialization.

use crate::constants::{buckets, server};

/// Default update-loop latency buckets (milliseconds)
#[inline]
pub fn latency_buckets() -> Vec<f64> {
    buckets::LATENCY.to_vec()
}

/// Default queue/buffer depth buckets (segments)
#[inline]
pub fn size_buckets() -> Vec<f64> {
    buckets::SIZE.to_vec()
}

#[inline]
pub fn server_host() -> String {
    server::DEFAULT_HOST.to_string()
}

#[inline]
pub fn server_port() -> u16 {
    server::DEFAULT_PORT
}

#[inline]
pub fn server_path() -> String {
    server::DEFAULT_PATH.to_string()
}
