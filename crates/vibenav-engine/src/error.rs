use vibenav_contracts::schema::SchemaViolation;

/// Failure reported by a provider call: an HTTP-like status when the provider
/// answered, `None` when the request never completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("provider request failed{}: {message}", status_suffix(.status))]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" ({code})")).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    MissingCredential,
    ProviderAuth,
    ProviderRateLimit,
    ProviderFailure,
    EmptyResponse,
    MalformedJson,
    SchemaViolation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::MissingCredential => "missing_credential",
            ErrorKind::ProviderAuth => "provider_auth",
            ErrorKind::ProviderRateLimit => "provider_rate_limit",
            ErrorKind::ProviderFailure => "provider_failure",
            ErrorKind::EmptyResponse => "empty_response",
            ErrorKind::MalformedJson => "malformed_json",
            ErrorKind::SchemaViolation => "schema_violation",
        }
    }

    /// Rejected before any network call was made.
    pub fn is_local(&self) -> bool {
        matches!(self, ErrorKind::EmptyInput | ErrorKind::MissingCredential)
    }
}

const AUTH_FAILURE_MESSAGE: &str = "The selected API key has no access to the pro model. \
Choose a key from a paid project and try again.";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no brand name, brand details or attached file was supplied")]
    EmptyInput,
    #[error("no validated credential is available")]
    MissingCredential,
    #[error("credential lacks access to the requested model")]
    ProviderAuth(#[source] ProviderError),
    #[error("provider rate limit or quota exceeded")]
    ProviderRateLimit(#[source] ProviderError),
    #[error("provider call failed")]
    ProviderFailure(#[source] ProviderError),
    #[error("provider returned no text")]
    EmptyResponse,
    #[error("model response is not valid JSON")]
    MalformedJson {
        snippet: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("model response does not match the blueprint schema")]
    SchemaViolation(#[from] SchemaViolation),
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::EmptyInput => ErrorKind::EmptyInput,
            GenerationError::MissingCredential => ErrorKind::MissingCredential,
            GenerationError::ProviderAuth(_) => ErrorKind::ProviderAuth,
            GenerationError::ProviderRateLimit(_) => ErrorKind::ProviderRateLimit,
            GenerationError::ProviderFailure(_) => ErrorKind::ProviderFailure,
            GenerationError::EmptyResponse => ErrorKind::EmptyResponse,
            GenerationError::MalformedJson { .. } => ErrorKind::MalformedJson,
            GenerationError::SchemaViolation(_) => ErrorKind::SchemaViolation,
        }
    }

    /// Message meant for the person at the keyboard. Diagnostics stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::EmptyInput => {
                "Enter a brand name or brand details, or attach a file, before generating."
            }
            ErrorKind::MissingCredential => "Connect an API key before generating.",
            ErrorKind::ProviderAuth => AUTH_FAILURE_MESSAGE,
            ErrorKind::ProviderRateLimit => {
                "Too many requests right now. Please wait a moment and try again."
            }
            ErrorKind::ProviderFailure
            | ErrorKind::EmptyResponse
            | ErrorKind::MalformedJson
            | ErrorKind::SchemaViolation => "Blueprint generation failed. Please try again.",
        }
    }

    pub fn invalidates_credential(&self) -> bool {
        matches!(self, GenerationError::ProviderAuth(_))
    }

    /// Offending response text, when the failure kept one.
    pub fn snippet(&self) -> Option<&str> {
        match self {
            GenerationError::MalformedJson { snippet, .. } => Some(snippet.as_str()),
            _ => None,
        }
    }
}

const AUTH_MARKERS: [&str; 4] = [
    "requested entity was not found",
    "permission_denied",
    "api key not valid",
    "api_key_invalid",
];

const RATE_LIMIT_MARKER: &str = "resource_exhausted";

/// Sorts a provider failure into the auth / rate-limit / generic buckets.
pub fn classify(err: ProviderError) -> GenerationError {
    let lowered = err.message.to_ascii_lowercase();
    let rate_limited = match err.status {
        Some(status) => status == 429 || lowered.contains(RATE_LIMIT_MARKER),
        // Without a status the code can only appear in the message text.
        None => lowered.contains(RATE_LIMIT_MARKER) || lowered.contains("429"),
    };
    if rate_limited {
        return GenerationError::ProviderRateLimit(err);
    }
    if matches!(err.status, Some(401 | 403 | 404))
        || AUTH_MARKERS.iter().any(|m| lowered.contains(m))
    {
        return GenerationError::ProviderAuth(err);
    }
    GenerationError::ProviderFailure(err)
}

#[cfg(test)]
mod tests {
    use super::{classify, ErrorKind, GenerationError, ProviderError};

    fn kind_of(status: Option<u16>, message: &str) -> ErrorKind {
        classify(ProviderError::new(status, message)).kind()
    }

    #[test]
    fn provider_error_display_includes_status_when_known() {
        assert_eq!(
            ProviderError::new(Some(503), "overloaded").to_string(),
            "provider request failed (503): overloaded"
        );
        assert_eq!(
            ProviderError::transport("connection reset").to_string(),
            "provider request failed: connection reset"
        );
    }

    #[test]
    fn classify_rate_limit_by_status_or_message() {
        assert_eq!(
            kind_of(Some(429), "slow down"),
            ErrorKind::ProviderRateLimit
        );
        assert_eq!(
            kind_of(None, "got 429 Too Many Requests"),
            ErrorKind::ProviderRateLimit
        );
        assert_eq!(
            kind_of(Some(400), "RESOURCE_EXHAUSTED: quota"),
            ErrorKind::ProviderRateLimit
        );
    }

    #[test]
    fn digits_in_a_message_with_a_status_are_not_a_rate_limit() {
        assert_eq!(
            kind_of(Some(500), "internal error, request id 84291"),
            ErrorKind::ProviderFailure
        );
        assert_eq!(
            kind_of(Some(400), "field 'maxTokens' must be below 4290"),
            ErrorKind::ProviderFailure
        );
    }

    #[test]
    fn classify_auth_failures() {
        let err = ProviderError::new(Some(404), "NOT_FOUND: Requested entity was not found");
        let not_found = classify(err);
        assert_eq!(not_found.kind(), ErrorKind::ProviderAuth);
        assert!(not_found.invalidates_credential());

        assert_eq!(
            kind_of(Some(400), "API key not valid. Please pass a valid API key."),
            ErrorKind::ProviderAuth
        );
        assert_eq!(kind_of(Some(403), "forbidden"), ErrorKind::ProviderAuth);
    }

    #[test]
    fn classify_other_failures_as_generic() {
        let err = classify(ProviderError::new(Some(500), "internal"));
        assert_eq!(err.kind(), ErrorKind::ProviderFailure);
        assert!(!err.invalidates_credential());
        assert_eq!(
            err.user_message(),
            "Blueprint generation failed. Please try again."
        );
        assert_eq!(kind_of(None, "timed out"), ErrorKind::ProviderFailure);
    }

    #[test]
    fn local_kinds_are_flagged() {
        assert!(GenerationError::EmptyInput.kind().is_local());
        assert!(GenerationError::MissingCredential.kind().is_local());
        assert!(!GenerationError::EmptyResponse.kind().is_local());
        assert_eq!(ErrorKind::ProviderRateLimit.as_str(), "provider_rate_limit");
    }

    #[test]
    fn user_messages_are_category_specific() {
        let auth = GenerationError::ProviderAuth(ProviderError::new(Some(404), "x"));
        assert!(auth.user_message().contains("pro model"));
        let limit = GenerationError::ProviderRateLimit(ProviderError::new(Some(429), "x"));
        assert!(limit.user_message().contains("try again"));
        assert!(GenerationError::EmptyResponse.snippet().is_none());
    }
}
