use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Cart limit reached! You cannot add more than {0} items.")]
    CapacityExceeded(usize),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Order not found or cannot be cancelled")]
    NotCancellable,
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(what: &str) -> Self {
        DomainError::NotFound(format!("{what} not found"))
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        DomainError::InvalidInput(msg.into())
    }
}
