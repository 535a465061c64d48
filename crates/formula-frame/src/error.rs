pub type FrameResult<T> = Result<T, FrameError>;

/// Errors returned by `formula-frame` operations.
///
/// Argument validation happens when an operator is called; lazily evaluated pipelines never
/// surface these errors mid-traversal.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FrameError {
    /// An operator received an argument it cannot work with.
    #[error("{operation}: invalid argument '{parameter}': {message}")]
    InvalidArgument {
        operation: &'static str,
        parameter: &'static str,
        message: String,
    },

    /// An ordering predicate was requested for an index whose values have no defined ordering.
    #[error("unsupported index type: {type_name}")]
    UnsupportedIndexType { type_name: String },

    /// The operation is not supported for the current data.
    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },

    /// The operation needs at least one element.
    #[error("{operation}: sequence contains no elements")]
    EmptySequence { operation: &'static str },

    /// Referenced column does not exist.
    #[error("column not found: {name}")]
    ColumnNotFound { name: String },

    /// An upstream record source failed.
    #[error("record source error: {message}")]
    RecordSource { message: String },
}

impl FrameError {
    pub fn invalid_argument(
        operation: &'static str,
        parameter: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            operation,
            parameter,
            message: message.into(),
        }
    }

    pub fn unsupported_index_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedIndexType {
            type_name: type_name.into(),
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn empty_sequence(operation: &'static str) -> Self {
        Self::EmptySequence { operation }
    }

    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    pub fn record_source(message: impl Into<String>) -> Self {
        Self::RecordSource {
            message: message.into(),
        }
    }
}

/// Reject a zero window/period length.
pub(crate) fn ensure_positive(
    operation: &'static str,
    parameter: &'static str,
    value: usize,
) -> FrameResult<()> {
    if value == 0 {
        return Err(FrameError::invalid_argument(
            operation,
            parameter,
            "must be greater than zero",
        ));
    }
    Ok(())
}
