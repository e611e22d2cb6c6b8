use thiserror::Error;

/// Error taxonomy for the hi-color GIF pipeline (spec §7).
///
/// `InternalInvariant` violations are not represented here: per policy
/// they panic rather than propagate, since a malformed GIF must never be
/// emitted.
#[derive(Error, Debug)]
pub enum Error {
    #[error("E_ARG_{kind}: {message}")]
    InvalidArgument { kind: &'static str, message: String },

    #[error("E_MALFORMED_{kind}: {message}")]
    MalformedInput { kind: &'static str, message: String },

    #[error("E_IO: {message}")]
    IoFailure {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn code(&self) -> String {
        match self {
            Error::InvalidArgument { kind, .. } => format!("E_ARG_{kind}"),
            Error::MalformedInput { kind, .. } => format!("E_MALFORMED_{kind}"),
            Error::IoFailure { .. } => "E_IO".to_string(),
        }
    }

    pub fn invalid_argument(kind: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed_input(kind: &'static str, message: impl Into<String>) -> Self {
        Error::MalformedInput {
            kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
