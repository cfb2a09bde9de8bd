use shared::MessageResponse;
use thiserror::Error;

pub const NETWORK_FAILURE_MESSAGE: &str = "Unable to connect to server. Please check your connection.";
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Invalid response from server";

/// Failure of a single API call. Never retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// A 2xx response whose body is missing required fields or is not valid JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("could not encode request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }

    /// Message shown to the user. HTTP errors prefer the server's
    /// `{"message": ...}` or plain-text body over `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Network(_) => NETWORK_FAILURE_MESSAGE.to_string(),
            ApiError::MalformedResponse(_) => MALFORMED_RESPONSE_MESSAGE.to_string(),
            ApiError::Http { body, .. } => server_message(body).unwrap_or_else(|| fallback.to_string()),
            ApiError::Encode(_) => fallback.to_string(),
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
            serde_json::Value::Object(_) => serde_json::from_value::<MessageResponse>(value)
                .ok()
                .map(|reply| reply.message)
                .filter(|message| !message.trim().is_empty()),
            _ => None,
        },
        Err(_) => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: &str) -> ApiError {
        ApiError::Http { status, body: body.to_string() }
    }

    #[test]
    fn only_401_is_unauthorized() {
        assert!(http(401, "").is_unauthorized());
        assert!(!http(403, "").is_unauthorized());
        assert!(!ApiError::Network("offline".into()).is_unauthorized());
    }

    #[test]
    fn message_field_wins() {
        let err = http(400, r#"{"message": "Login failed: Bad credentials"}"#);
        assert_eq!(err.user_message("Login failed"), "Login failed: Bad credentials");
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        let err = http(400, "Username is already taken");
        assert_eq!(err.user_message("Registration failed"), "Username is already taken");

        let err = http(400, r#""Email is already registered""#);
        assert_eq!(err.user_message("Registration failed"), "Email is already registered");
    }

    #[test]
    fn falls_back_when_body_has_nothing_to_say() {
        assert_eq!(http(500, "").user_message("Login failed"), "Login failed");
        assert_eq!(http(500, r#"{"error": "boom"}"#).user_message("Login failed"), "Login failed");
        assert_eq!(http(500, "[]").user_message("Login failed"), "Login failed");
    }

    #[test]
    fn transport_and_shape_failures_use_fixed_messages() {
        assert_eq!(
            ApiError::Network("offline".into()).user_message("Login failed"),
            NETWORK_FAILURE_MESSAGE
        );
        assert_eq!(
            ApiError::MalformedResponse("missing token".into()).user_message("Login failed"),
            MALFORMED_RESPONSE_MESSAGE
        );
    }
}
