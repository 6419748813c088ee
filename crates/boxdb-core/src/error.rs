use crate::{
    buffer::{BufferError, DecodeError},
    engine::NativeError,
    model::ModelError,
};
use boxdb_primitives::TypeId;
use thiserror::Error as ThisError;

///
/// Error
///
/// Runtime error surfaced by boxes, queries and generated bindings.
/// Nothing is retried internally; every variant reaches the caller as-is.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("illegal state; query was closed")]
    ClosedResource,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Native(#[from] NativeError),

    #[error(transparent)]
    ParamArity(#[from] ParamArityError),

    #[error("entity type {0} is not part of the store model")]
    UnknownEntity(TypeId),

    #[error("limit/offset are not supported by {operation} at this moment")]
    UnsupportedOptionCombination { operation: &'static str },
}

impl Error {
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::ClosedResource)
    }

    /// Native error code, if the failure came from the engine.
    #[must_use]
    pub const fn native_code(&self) -> Option<i32> {
        match self {
            Self::Native(err) => Some(err.code),
            _ => None,
        }
    }
}

///
/// ParamArityError
///
/// Wrong number of values passed to a query parameter setter.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum ParamArityError {
    #[error("no values given")]
    NoValues,

    #[error("too many values given")]
    TooManyValues { given: usize, max: usize },
}

impl ParamArityError {
    /// Check `given` against an upper bound; `None` means any non-zero count.
    pub const fn check(given: usize, max: Option<usize>) -> Result<(), Self> {
        if given == 0 {
            return Err(Self::NoValues);
        }

        match max {
            Some(max) if given > max => Err(Self::TooManyValues { given, max }),
            _ => Ok(()),
        }
    }
}
