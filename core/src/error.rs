use thiserror::Error;

pub const LOAD_FAILED_MESSAGE: &str = "خطا در بارگذاری داده‌ها";

/// Failure of a single report request.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection failed or the request was rejected before a usable response
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status without an application error body
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// The server answered with an `error` field
    #[error("Server error: {0}")]
    Application(String),

    /// The payload did not decode or broke a report invariant
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Inline message shown in place of the grid or detail area.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Application(message) => format!("خطا: {}", message),
            FetchError::Transport(_) | FetchError::Status(_) | FetchError::Malformed(_) => {
                LOAD_FAILED_MESSAGE.to_string()
            }
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            FetchError::Application("Invalid month".to_string()).user_message(),
            "خطا: Invalid month"
        );
        assert_eq!(FetchError::Status(502).user_message(), LOAD_FAILED_MESSAGE);
        assert_eq!(
            FetchError::Malformed("missing field".to_string()).user_message(),
            LOAD_FAILED_MESSAGE
        );
    }
}
