//! # Stage Output
//!
//! The tri-state result of a pipeline transform. Making "dropped on
//! purpose" a first-class variant keeps it from being conflated with
//! either success or failure.

/// Result of one pipeline stage applied to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutput<T, E> {
    /// The element was transformed; propagate it downstream.
    Value(T),
    /// The transform failed; route to the error stream.
    Error(E),
    /// The element is intentionally dropped. Not an error.
    Skipped,
}

impl<T, E> StageOutput<T, E> {
    /// Whether this output carries a value.
    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Whether this output carries an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Whether the element was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

impl<T, E> From<Result<T, E>> for StageOutput<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(err) => Self::Error(err),
        }
    }
}
