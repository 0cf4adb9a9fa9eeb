use fishbowl_core::DomainError;

/// Error returned when bytes cannot be turned into (or from) a Fishbowl
/// message. Server-reported failures are not codec errors; see
/// [`fishbowl_core::RemoteError`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The body is not well-formed XML.
    #[error("malformed xml: {0}")]
    Malformed(String),

    /// The document root is not `FbiXml`.
    #[error("unexpected root element {0:?}, expected FbiXml")]
    UnexpectedRoot(String),

    /// A structural element of the envelope is absent.
    #[error("missing {0} element")]
    MissingElement(&'static str),

    /// A `statusCode` attribute is not a number.
    #[error("invalid status code {0:?}")]
    InvalidStatus(String),

    /// The text contains a character outside Latin-1.
    #[error("character {0:?} cannot be encoded as Latin-1")]
    Unencodable(char),

    /// A request envelope carried a different operation than the caller asked for.
    #[error("expected {expected} request, found {found}")]
    UnexpectedRequest { expected: &'static str, found: String },

    /// Query rows were not valid CSV.
    #[error("invalid query rows: {0}")]
    Rows(String),

    /// Decoded fields failed request validation.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CodecError {
    pub(crate) fn malformed(err: impl core::fmt::Display) -> Self {
        Self::Malformed(err.to_string())
    }
}
