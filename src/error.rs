use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;
use rand_distr::uniform::Error as UniformError;

use crate::arch::ParamKind;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, CaErr>;

/// The autoencoder's error type.
#[derive(Debug)]
pub enum CaErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    MissingParams {
        kind: ParamKind,
    },
    ParamsAlreadySet {
        kind: ParamKind,
    },
    InvalidRange(UniformError),
    Shape(ShapeError),
}

impl Display for CaErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(f, "size mismatch for {what}: got {got}, expected {expected}"),
            CaErr::MissingParams { kind } => {
                write!(f, "the {kind} parameters were never added to the manager")
            }
            CaErr::ParamsAlreadySet { kind } => {
                write!(f, "the {kind} parameters were already added to the manager")
            }
            CaErr::InvalidRange(e) => write!(f, "invalid initialization range: {e}"),
            CaErr::Shape(e) => write!(f, "shape error: {e}"),
        }
    }
}

impl Error for CaErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CaErr::InvalidRange(e) => Some(e),
            CaErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UniformError> for CaErr {
    fn from(value: UniformError) -> Self {
        Self::InvalidRange(value)
    }
}

impl From<ShapeError> for CaErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}
