mod data_type;
mod display;
mod error;
mod literal;
mod native;
mod tensor;

pub mod convert;
pub mod shape;

pub use data_type::{DataType, UnknownDataType};
pub use error::{ShapeError, TensorError, TypeMismatch};
pub use literal::{Kind, Literal};
pub use tensor::{Tensor, TensorData, infer_dtype};
pub use {digit_layout, num_complex};
