//! Error types for the matching engine
//!
//! A submission fails with either `InvalidOrder` or `Overflow`. Both are
//! detected before the book is touched.

use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("Arithmetic overflow: {context}")]
    Overflow { context: String },
}

/// Reasons an order fails validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Duplicate order id: {0} is already resting")]
    DuplicateId(String),

    #[error("{field} has {scale} decimal places, at most {max} allowed")]
    ExcessPrecision { field: &'static str, scale: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_display() {
        let err = OrderError::InvalidPrice("negative".to_string());
        assert_eq!(err.to_string(), "Invalid price: negative");
    }

    #[test]
    fn test_engine_error_from_order_error() {
        let order_err = OrderError::InvalidSide("hold".to_string());
        let engine_err: EngineError = order_err.into();
        assert!(matches!(engine_err, EngineError::InvalidOrder(_)));
        assert_eq!(engine_err.to_string(), "Invalid order: Invalid side: hold");
    }

    #[test]
    fn test_excess_precision_display() {
        let err = OrderError::ExcessPrecision { field: "price", scale: 9, max: 8 };
        assert_eq!(err.to_string(), "price has 9 decimal places, at most 8 allowed");
    }
}
