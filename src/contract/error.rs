//! Contract read errors

use thiserror::Error;

/// Errors that can occur reading from the fund contract
#[derive(Error, Debug)]
pub enum RpcError {
    /// RPC endpoint could not be reached
    #[error("RPC endpoint unavailable")]
    Unavailable,

    /// Request exceeded the configured timeout
    #[error("RPC request timeout")]
    Timeout,

    /// Transport-level failure not covered above
    #[error("RPC request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with a non-success HTTP status
    #[error("RPC endpoint returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// JSON-RPC error object (e.g. execution reverted)
    #[error("RPC error {code}: {message}")]
    Node { code: i64, message: String },

    /// Response had the wrong shape or type
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl RpcError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Timeout
        } else if e.is_connect() {
            RpcError::Unavailable
        } else if e.is_decode() {
            RpcError::Malformed(e.to_string())
        } else {
            RpcError::Transport(e)
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Malformed(err.to_string())
    }
}

/// Result type alias for contract reads
pub type RpcResult<T> = Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RpcError::Node {
            code: 3,
            message: "execution reverted".to_string(),
        };
        assert_eq!(err.to_string(), "RPC error 3: execution reverted");

        let err = RpcError::Malformed("word 2 out of range".to_string());
        assert_eq!(err.to_string(), "Malformed response: word 2 out of range");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let err: RpcError = json_err.into();
        assert!(matches!(err, RpcError::Malformed(_)));
    }
}
