//! Error types for the evictkit library.
//!
//! - [`ConfigError`]: invalid construction parameters, returned by
//!   [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
//! - [`InvariantError`]: a violated internal invariant, returned by the
//!   non-panicking `check_invariants` probes the test harnesses use.
//!
//! A cache miss is never an error; these types cover configuration and
//! programming mistakes only.

use std::fmt;

/// Error returned when cache configuration parameters are invalid.
///
/// # Example
///
/// ```
/// use evictkit::builder::{CacheBuilder, EvictionPolicy};
///
/// let err = CacheBuilder::new(8)
///     .try_build::<u64, u64>(EvictionPolicy::Arc { transform_threshold: 0 })
///     .unwrap_err();
/// assert!(err.to_string().contains("transform_threshold"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Error returned when an internal cache invariant is violated.
///
/// Carries a human-readable description of which invariant failed.
/// Produced by the engines' `check_invariants` methods; a `Some` result
/// from those always indicates a bug in this crate, not in the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
