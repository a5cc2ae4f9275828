use crate::foundation::version::Game;

pub type FxrResult<T> = Result<T, FxrError>;

#[derive(thiserror::Error, Debug)]
pub enum FxrError {
    #[error("format error at offset {offset:#x}: {message}")]
    Format { offset: usize, message: String },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("{what} is not supported for {game}")]
    UnsupportedForVersion { what: String, game: Game },

    #[error("reservation error: {0}")]
    Reservation(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("schema error: {0}")]
    Schema(String),
}

impl FxrError {
    pub fn format(offset: usize, msg: impl Into<String>) -> Self {
        Self::Format {
            offset,
            message: msg.into(),
        }
    }

    pub fn unsupported(what: impl Into<String>, game: Game) -> Self {
        Self::UnsupportedForVersion {
            what: what.into(),
            game,
        }
    }

    pub fn reservation(msg: impl Into<String>) -> Self {
        Self::Reservation(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// `true` for errors caused by malformed input bytes.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::UnexpectedEof { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
