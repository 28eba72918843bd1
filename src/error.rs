use crate::StatusCode;
use std::{fmt, io, path::PathBuf};
use thiserror::Error;

/// File operation that failed during buffer persistence.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IoOp {
    Open,
    Create,
    Read,
    Write,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoOp::Open => "open",
            IoOp::Create => "create",
            IoOp::Read => "read",
            IoOp::Write => "write",
        })
    }
}

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("couldn't allocate storage for {requested} elements")]
    AllocationFailure { requested: usize },

    #[error("buffer is full ({capacity} elements)")]
    CapacityExceeded { capacity: usize },

    #[error("{0} is not supported for this element type")]
    UnsupportedOperation(&'static str),

    #[error("buffer is not initialized")]
    NotInitialized,

    #[error("buffer is empty")]
    Empty,

    #[error("buffer size {size} is not a multiple of {multiple}")]
    WrongSize { size: usize, multiple: usize },

    #[error("couldn't {op} {}", .path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BufferError {
    pub(crate) fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        BufferError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Status code the driver API uses for this condition.
    pub fn status(&self) -> StatusCode {
        match self {
            BufferError::AllocationFailure { .. } => StatusCode::MemoryAllocationError,
            BufferError::CapacityExceeded { .. } => StatusCode::BufferInsufficientSize,
            BufferError::UnsupportedOperation(_) => StatusCode::BufferWrongDataType,
            BufferError::NotInitialized => StatusCode::BufferNotInitialized,
            BufferError::Empty => StatusCode::BufferIsEmpty,
            BufferError::WrongSize { .. } => StatusCode::BufferWrongSize,
            BufferError::Io { op, .. } => match op {
                IoOp::Open => StatusCode::FileCantOpen,
                IoOp::Create => StatusCode::FileCantCreate,
                IoOp::Read => StatusCode::FileCantRead,
                IoOp::Write => StatusCode::FileCantWrite,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            BufferError::AllocationFailure { requested: 4 }.status(),
            StatusCode::MemoryAllocationError
        );
        assert_eq!(
            BufferError::CapacityExceeded { capacity: 4 }.status(),
            StatusCode::BufferInsufficientSize
        );
        assert_eq!(
            BufferError::UnsupportedOperation("sort").status(),
            StatusCode::BufferWrongDataType
        );
        let err = BufferError::io(
            IoOp::Read,
            "data.bin",
            io::Error::from(io::ErrorKind::UnexpectedEof),
        );
        assert_eq!(err.status(), StatusCode::FileCantRead);
        assert_eq!(err.to_string(), "couldn't read data.bin");
    }
}
