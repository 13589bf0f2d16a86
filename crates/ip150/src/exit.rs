use std::fmt;

use ip150_frame::FrameError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    let code = match &err {
        FrameError::InvalidMemoryRequest { .. } | FrameError::InvalidPartition { .. } => USAGE,
        FrameError::PayloadTooLarge { .. }
        | FrameError::InvalidStartOfHeader(_)
        | FrameError::UnknownMessageType(_)
        | FrameError::UnknownEncryptionFlag(_)
        | FrameError::Truncated { .. } => DATA_INVALID,
        FrameError::ConnectionClosed => FAILURE,
        FrameError::Io(_) => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_usage() {
        let err = frame_error("build", FrameError::InvalidMemoryRequest { length: 0 });
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("build: invalid memory request length 0"));
    }

    #[test]
    fn malformed_input_is_data_invalid() {
        let err = frame_error("decode", FrameError::InvalidStartOfHeader(0x12));
        assert_eq!(err.code, DATA_INVALID);
    }
}
