use thiserror::Error;

pub type Result<T> = std::result::Result<T, HandlerError>;

/// Failure reported by a settings asset handler while building a contribution.
///
/// The cache never propagates these: a failed build is treated as "no contribution".
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed asset for {handler}: {reason}")]
    Malformed {
        handler: &'static str,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}
