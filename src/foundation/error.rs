pub type MetaloopResult<T> = Result<T, MetaloopError>;

#[derive(thiserror::Error, Debug)]
pub enum MetaloopError {
    #[error("invalid color component: {0} is outside [0, 1]")]
    InvalidColorComponent(f64),

    #[error("invalid hex color \"{0}\": expected RRGGBB or #RRGGBB")]
    InvalidHexFormat(String),

    #[error("invalid frame range: end frame {end} must be after start frame {start}")]
    InvalidFrameRange { start: u64, end: u64 },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MetaloopError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn invalid_hex(hex: impl Into<String>) -> Self {
        Self::InvalidHexFormat(hex.into())
    }
}

impl From<serde_json::Error> for MetaloopError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
