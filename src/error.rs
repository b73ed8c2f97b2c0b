//! Error types for heap operations
//!
//! The heap's algorithms assume a disciplined caller. Every precondition a
//! caller can break is checked up front and reported as
//! [`HeapError::InvalidOperation`], before any node is touched, so a rejected
//! call leaves the heap exactly as it was.

use std::fmt;

/// The precondition a rejected call violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidOperation {
    /// `delete_min` was called on an empty heap
    EmptyHeap,
    /// The element is not currently stored in this heap (never inserted,
    /// already removed, or owned by a different heap)
    NotInHeap,
    /// The element is already stored in a heap
    AlreadyInHeap,
    /// `decrease_key` was given a priority greater than the current one
    PriorityIncreased,
}

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidOperation::EmptyHeap => write!(f, "heap is empty"),
            InvalidOperation::NotInHeap => write!(f, "element is not in this heap"),
            InvalidOperation::AlreadyInHeap => write!(f, "element is already in a heap"),
            InvalidOperation::PriorityIncreased => {
                write!(f, "new priority is greater than current priority")
            }
        }
    }
}

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapError {
    /// The caller violated a precondition of the operation
    InvalidOperation(InvalidOperation),
}

impl HeapError {
    /// Returns the violated precondition
    pub fn reason(&self) -> InvalidOperation {
        match self {
            HeapError::InvalidOperation(reason) => *reason,
        }
    }
}

impl From<InvalidOperation> for HeapError {
    fn from(reason: InvalidOperation) -> Self {
        HeapError::InvalidOperation(reason)
    }
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidOperation(reason) => write!(f, "invalid operation: {}", reason),
        }
    }
}

impl std::error::Error for HeapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = HeapError::from(InvalidOperation::EmptyHeap);
        assert_eq!(err.to_string(), "invalid operation: heap is empty");

        let err = HeapError::from(InvalidOperation::PriorityIncreased);
        assert_eq!(
            err.to_string(),
            "invalid operation: new priority is greater than current priority"
        );
    }

    #[test]
    fn test_reason() {
        let err: HeapError = InvalidOperation::NotInHeap.into();
        assert_eq!(err.reason(), InvalidOperation::NotInHeap);
        assert_eq!(err, HeapError::InvalidOperation(InvalidOperation::NotInHeap));
    }
}
