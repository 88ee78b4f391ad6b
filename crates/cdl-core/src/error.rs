use thiserror::Error;

pub type CdlResult<T> = Result<T, CdlError>;

/// Errors raised by blocks and the time manager.
///
/// Every variant is fatal for the call that produced it. Nothing in the
/// block library retries or swallows these; the driver decides what a
/// failed step means.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CdlError {
    /// Invalid parameter combination detected at construction time.
    #[error("Invalid configuration for {block}: {what}")]
    Configuration {
        block: &'static str,
        what: &'static str,
    },

    /// A time-dependent block was evaluated without an attached time manager.
    #[error("{block} requires a TimeManager for time-dependent operations")]
    MissingTimeSource { block: &'static str },

    /// Invalid runtime input to a mathematical block.
    #[error("Domain error in {block}: {what} (u={value})")]
    Domain {
        block: &'static str,
        what: &'static str,
        value: f64,
    },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl CdlError {
    pub fn config(block: &'static str, what: &'static str) -> Self {
        Self::Configuration { block, what }
    }

    pub fn domain(block: &'static str, what: &'static str, value: f64) -> Self {
        Self::Domain { block, what, value }
    }

    /// True for errors caused by construction-time parameters.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
