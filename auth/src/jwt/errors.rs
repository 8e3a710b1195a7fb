use thiserror::Error;

/// Error type for JWT operations.
///
/// `MalformedToken`, `InvalidSignature`, `Expired` and `Unexpected` are
/// distinct for logging only. Callers must collapse them into a single
/// "unauthorized" response; see [`TokenError::is_unauthorized`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signing secret missing. A startup misconfiguration surfaced per call.
    #[error("Token signing is not configured: {0}")]
    Configuration(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    /// The JWT library reported a failure outside the known taxonomy.
    #[error("Unexpected token failure: {0}")]
    Unexpected(String),
}

impl TokenError {
    /// True for failures caused by the presented token rather than by the server.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            TokenError::MalformedToken(_)
                | TokenError::InvalidSignature
                | TokenError::Expired
                | TokenError::Unexpected(_)
        )
    }

    /// Short label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Configuration(_) => "configuration",
            TokenError::EncodingFailed(_) => "encoding",
            TokenError::MalformedToken(_) => "malformed",
            TokenError::InvalidSignature => "signature",
            TokenError::Expired => "expired",
            TokenError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::MalformedToken(error.to_string()),
            // A header naming any algorithm other than the one we sign with
            // is treated as a forged signature.
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Unexpected(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::errors::ErrorKind;

    use super::*;

    #[test]
    fn test_library_errors_map_to_taxonomy() {
        assert_eq!(
            TokenError::from(jsonwebtoken::errors::Error::from(ErrorKind::InvalidSignature)),
            TokenError::InvalidSignature
        );
        assert_eq!(
            TokenError::from(jsonwebtoken::errors::Error::from(ErrorKind::ExpiredSignature)),
            TokenError::Expired
        );
        assert!(matches!(
            TokenError::from(jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken)),
            TokenError::MalformedToken(_)
        ));
        assert!(matches!(
            TokenError::from(jsonwebtoken::errors::Error::from(ErrorKind::InvalidKeyFormat)),
            TokenError::Unexpected(_)
        ));
    }

    #[test]
    fn test_unauthorized_classification() {
        assert!(TokenError::Expired.is_unauthorized());
        assert!(TokenError::InvalidSignature.is_unauthorized());
        assert!(TokenError::MalformedToken("bad".into()).is_unauthorized());
        assert!(!TokenError::Configuration("empty secret".into()).is_unauthorized());
    }
}
