#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    InvalidArgument(&'static str),
    Overflow,
}

impl CoreError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidArgument(message) => message,
            Self::Overflow => "point total would overflow",
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Overflow => write!(f, "overflow: point total would overflow"),
        }
    }
}

impl std::error::Error for CoreError {}
