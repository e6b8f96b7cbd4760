use thiserror::Error;

pub type Result<T> = std::result::Result<T, VsqueryError>;

#[derive(Error, Debug)]
pub enum VsqueryError {
    /// Date string that cannot be turned into a calendar date.
    #[error("invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    /// Flag value out of range or unparseable.
    #[error("invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    /// Object token that neither resolver strategy could turn into coordinates.
    #[error("no results found for object '{token}': {reason}")]
    Unresolvable { token: String, reason: String },

    #[error("ephemeris unavailable for {subject}: {reason}")]
    EphemerisUnavailable { subject: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VsqueryError {
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        VsqueryError::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        VsqueryError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn unresolvable(token: impl Into<String>, reason: impl Into<String>) -> Self {
        VsqueryError::Unresolvable {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn ephemeris(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        VsqueryError::EphemerisUnavailable {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Failures scoped to a single object; the session reports them and moves on.
    pub fn is_object_scoped(&self) -> bool {
        matches!(
            self,
            VsqueryError::Unresolvable { .. } | VsqueryError::EphemerisUnavailable { .. }
        )
    }
}
