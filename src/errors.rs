/// Structured error handling for rsiwatch
///
/// Splits the two failure worlds apart at the type level: `Configuration`
/// is only raised at startup and is fatal, everything else is raised inside
/// a monitor cycle and handled at the cycle boundary (log, best-effort
/// notification, backoff, retry).
#[derive(Debug, Clone, PartialEq)]
pub enum RsiWatchError {
    /// Market data that cannot be decoded into the expected candle shape.
    MalformedData { context: String, error: String },

    /// A price series shorter than the lookback an indicator requires.
    InsufficientData { required: usize, available: usize },

    /// Transport-level failure from any collaborator.
    Network { endpoint: String, message: String },

    /// Invalid or missing configuration. Fatal at startup, never raised
    /// inside a cycle.
    Configuration { message: String },
}

impl std::fmt::Display for RsiWatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsiWatchError::MalformedData { context, error } => {
                write!(f, "Malformed market data ({}): {}", context, error)
            }
            RsiWatchError::InsufficientData {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data: need {} closes, got {}",
                    required, available
                )
            }
            RsiWatchError::Network { endpoint, message } => {
                write!(f, "Network error from {}: {}", endpoint, message)
            }
            RsiWatchError::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for RsiWatchError {}

impl RsiWatchError {
    pub fn malformed(context: impl Into<String>, error: impl Into<String>) -> Self {
        RsiWatchError::MalformedData {
            context: context.into(),
            error: error.into(),
        }
    }

    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        RsiWatchError::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        RsiWatchError::Configuration {
            message: message.into(),
        }
    }

    /// True for errors a cycle may recover from by backing off and retrying.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, RsiWatchError::Configuration { .. })
    }
}

impl From<reqwest::Error> for RsiWatchError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        RsiWatchError::Network {
            endpoint,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RsiWatchError {
    fn from(err: serde_json::Error) -> Self {
        RsiWatchError::MalformedData {
            context: "JSON".to_string(),
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = RsiWatchError::malformed("kline row 3", "non-numeric close");
        assert_eq!(
            err.to_string(),
            "Malformed market data (kline row 3): non-numeric close"
        );

        let err = RsiWatchError::InsufficientData {
            required: 7,
            available: 4,
        };
        assert_eq!(err.to_string(), "Insufficient data: need 7 closes, got 4");
    }

    #[test]
    fn configuration_is_not_retryable() {
        assert!(!RsiWatchError::configuration("down >= up").is_retryable());
        assert!(RsiWatchError::network("x", "timeout").is_retryable());
        assert!(RsiWatchError::InsufficientData {
            required: 7,
            available: 0
        }
        .is_retryable());
    }
}
