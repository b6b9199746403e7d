//! Error types for the instrument cluster.
//!
//! The simulation core never fails: out-of-range numbers are clamped. Errors only
//! come from collaborators (display panels, GPIO lines) and from rejecting an
//! unusable [`SimConfig`](crate::config::SimConfig) at construction time.

use core::fmt;

/// Result type for cluster operations.
pub type Result<T> = core::result::Result<T, ClusterError>;

/// Cluster-level errors.
///
/// Platform drivers map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClusterError {
    /// Display panel did not come up (bus or controller not responding).
    DisplayInit,
    /// Drawing operation was issued before `init()`.
    NotInitialized,
    /// Draw target rejected a drawing operation.
    Draw,
    /// Backlight pin could not be driven.
    Backlight,
    /// Button or output line could not be read or written.
    Gpio,
    /// Configuration rejected by [`SimConfig::validate`](crate::config::SimConfig::validate).
    InvalidConfig(&'static str),
}

impl fmt::Display for ClusterError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::DisplayInit => f.write_str("display initialization failed"),
            Self::NotInitialized => f.write_str("display used before init"),
            Self::Draw => f.write_str("draw operation failed"),
            Self::Backlight => f.write_str("backlight control failed"),
            Self::Gpio => f.write_str("gpio access failed"),
            Self::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl core::error::Error for ClusterError {}
