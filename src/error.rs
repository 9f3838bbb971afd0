use thiserror::Error;

pub type Result<T> = std::result::Result<T, NameServiceError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameServiceError {
    #[error("Client not configured: {0}")]
    Configuration(String),

    #[error("No viable bump seed for program derived address")]
    PdaNotFound,

    #[error("Invalid name. Use 3–64 chars: a–z, 0–9, \"-\"")]
    InvalidName,

    #[error("Invalid number of years: {0} (allowed 1–10)")]
    InvalidYears(u8),

    #[error("{0}")]
    NotFound(String),

    #[error("Account discriminator mismatch for {0}")]
    DiscriminatorMismatch(&'static str),

    #[error("Unknown account discriminator")]
    UnknownAccount,

    #[error("Malformed account data: {0}")]
    MalformedAccount(String),

    #[error("Invalid instruction data")]
    InvalidInstructionData,

    #[error("Name is held by another owner")]
    NameLocked,

    #[error("{0}")]
    Transport(String),

    #[error("System clock is set before the unix epoch")]
    ClockBeforeEpoch,
}

impl NameServiceError {
    /// Decode failures only poison the record they came from.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::DiscriminatorMismatch(_) | Self::UnknownAccount | Self::MalformedAccount(_)
        )
    }
}

impl From<std::io::Error> for NameServiceError {
    fn from(e: std::io::Error) -> Self {
        NameServiceError::MalformedAccount(e.to_string())
    }
}
