use crate::{DataType, Kind};

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("irregular nesting at {path:?}: expected sub-shape {expected:?}, found {found:?}")]
    Irregular {
        path: Vec<usize>,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("index has {found} coordinates but the tensor has rank {rank}")]
    IndexArity { rank: usize, found: usize },
    #[error("coordinate {value} on axis {axis} is outside [1, {size}]")]
    IndexOutOfRange {
        axis: usize,
        value: usize,
        size: usize,
    },
}

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum TypeMismatch {
    #[error("leaf {index} is {found} but the tensor holds {expected} values")]
    MixedKinds {
        index: usize,
        expected: Kind,
        found: Kind,
    },
    #[error("leaf {index} ({found}) is not representable as {dtype}")]
    NotRepresentable {
        index: usize,
        dtype: DataType,
        found: Kind,
    },
}

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum TensorError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),
}
