use bus_types::TypeError;

pub type Result<T> = std::result::Result<T, SignatureError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid signature {signature:?} at offset {position}: {message}")]
    Invalid {
        signature: String,
        position: usize,
        message: &'static str,
    },

    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("type variable {0} is not in scope")]
    UnknownTypeVariable(String),

    #[error(transparent)]
    Type(#[from] TypeError),
}
