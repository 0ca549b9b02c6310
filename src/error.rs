//! Error types for tikdl

use thiserror::Error;

/// Coarse error codes, stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Input errors
    EmptyInput,
    InvalidFormat,

    // Run errors
    UnexpectedFailure,

    // System errors
    InvalidConfig,
    FileError,
}

impl ErrorCode {
    /// Process exit status: 1 for a failed run, 2 for bad input, 3 for
    /// config problems, 74 (EX_IOERR) for file errors
    pub fn exit_status(self) -> u8 {
        match self {
            Self::UnexpectedFailure => 1,
            Self::EmptyInput | Self::InvalidFormat => 2,
            Self::InvalidConfig => 3,
            Self::FileError => 74,
        }
    }
}

/// Main error type for tikdl
#[derive(Error, Debug)]
pub enum TikdlError {
    #[error("Please paste a TikTok URL")]
    EmptyInput,

    #[error("That doesn't look like a valid TikTok URL")]
    InvalidFormat,

    #[error("Something went wrong while processing the video: {0}")]
    UnexpectedFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TikdlError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyInput => ErrorCode::EmptyInput,
            Self::InvalidFormat => ErrorCode::InvalidFormat,
            Self::UnexpectedFailure(_) => ErrorCode::UnexpectedFailure,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
            Self::File(_) => ErrorCode::FileError,
            Self::Json(_) => ErrorCode::InvalidConfig,
        }
    }
}

pub type Result<T> = std::result::Result<T, TikdlError>;
