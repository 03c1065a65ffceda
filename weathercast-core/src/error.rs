use reqwest::StatusCode;
use thiserror::Error;

/// Failure modes of a single weather lookup.
///
/// `Status` carries the raw HTTP status and the provider's message without
/// judging them; deciding what a 404 or 401 means for the user is the
/// coordinator's job. `Network` and `Parse` hold plain messages so test
/// doubles can fabricate them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_mention_the_code_and_message() {
        let err = FetchError::Status {
            status: StatusCode::NOT_FOUND,
            message: "city not found".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("404"));
        assert!(rendered.contains("city not found"));
    }

    #[test]
    fn network_errors_render_their_message_verbatim() {
        assert_eq!(FetchError::Network("timeout".to_string()).to_string(), "timeout");
    }
}
