use {
    crate::constants::*,
    http::status::StatusCode,
    scratchstack_errors::ServiceError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Reason an attempt at authenticating a request with AWS SigV4 failed.
///
/// Every variant means the same thing to the client: the request is rejected with
/// `401 Unauthorized`. The variants exist so the cause can be logged on the server side; they must not be
/// surfaced in responses.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum AuthError {
    /// The request has no `Authorization` header.
    MissingHeader,

    /// The `Authorization` header could not be parsed. Sample messages:
    /// `Unsupported AWS 'algorithm': 'AWS3-ZZZ'.`
    /// `'FooBar' not a valid key=value pair (missing equal-sign) in Authorization header: '...'`
    /// `Authorization header requires 'Credential' parameter.`
    MalformedHeader(/* message */ String),

    /// The access key id in the credential is not the configured one.
    IdentityMismatch(/* message */ String),

    /// The credential scope does not match this server, or the signature did not match the calculated
    /// signature value.
    SignatureMismatch(Option</* message */ String>),
}

impl AuthError {
    pub(crate) fn error_code(&self) -> &'static str {
        match self {
            Self::MissingHeader => ERR_CODE_MISSING_HEADER,
            Self::MalformedHeader(_) => ERR_CODE_MALFORMED_HEADER,
            Self::IdentityMismatch(_) => ERR_CODE_IDENTITY_MISMATCH,
            Self::SignatureMismatch(_) => ERR_CODE_SIGNATURE_MISMATCH,
        }
    }

    /// Every authentication failure is reported with the same status.
    pub(crate) fn http_status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl ServiceError for AuthError {
    fn error_code(&self) -> &'static str {
        AuthError::error_code(self)
    }

    fn http_status(&self) -> StatusCode {
        AuthError::http_status(self)
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::MissingHeader => f.write_str("Authorization header missing"),
            Self::MalformedHeader(msg) => f.write_str(msg),
            Self::IdentityMismatch(msg) => f.write_str(msg),
            Self::SignatureMismatch(msg) => {
                if let Some(msg) = msg {
                    f.write_str(msg)
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Error for AuthError {}

/// Error returned when [`Credentials`][crate::Credentials] cannot be loaded from the environment.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required variable is not set, or is set to an empty value.
    MissingVariable(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::MissingVariable(name) => write!(f, "Required configuration variable {} is not set", name),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use {
        crate::{AuthError, ConfigError},
        scratchstack_errors::ServiceError,
    };

    #[test_log::test]
    fn every_cause_is_unauthorized() {
        let errors = [
            AuthError::MissingHeader,
            AuthError::MalformedHeader("bad".to_string()),
            AuthError::IdentityMismatch("who".to_string()),
            AuthError::SignatureMismatch(None),
        ];

        for e in &errors {
            assert_eq!(ServiceError::http_status(e), 401);
        }

        assert_eq!(ServiceError::error_code(&errors[0]), "MissingSecurityHeader");
        assert_eq!(ServiceError::error_code(&errors[1]), "AuthorizationHeaderMalformed");
        assert_eq!(ServiceError::error_code(&errors[2]), "InvalidAccessKeyId");
        assert_eq!(ServiceError::error_code(&errors[3]), "SignatureDoesNotMatch");
    }

    #[test_log::test]
    fn display() {
        assert_eq!(AuthError::MissingHeader.to_string(), "Authorization header missing");
        assert_eq!(AuthError::MalformedHeader("foo".to_string()).to_string(), "foo");
        assert_eq!(AuthError::SignatureMismatch(None).to_string(), "");
        assert_eq!(AuthError::SignatureMismatch(Some("bar".to_string())).to_string(), "bar");
        assert_eq!(
            ConfigError::MissingVariable("ACCESS_KEY_ID").to_string(),
            "Required configuration variable ACCESS_KEY_ID is not set"
        );
    }
}
