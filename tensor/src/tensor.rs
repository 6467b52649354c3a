use crate::{
    DataType, Kind, Literal, ShapeError, TensorError, TypeMismatch,
    convert::{exact_f32, exact_f64, narrow_f32},
    shape::{self, infer_shape},
};
use num_complex::Complex64;

/// 行优先展平的张量数据
#[derive(Clone, PartialEq, Debug)]
pub enum TensorData {
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    String(Vec<String>),
    Bool(Vec<bool>),
    Complex128(Vec<Complex64>),
}

/// A typed, shaped, row-major block of data.
#[derive(Clone, PartialEq, Debug)]
pub struct Tensor {
    dtype: DataType,
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// Builds a tensor from a nested literal, inferring the data type unless one is given.
    ///
    /// Under an explicit type every leaf must convert as [`convert`](crate::convert)
    /// allows: integers exactly, reals to `float32` by rounding.
    pub fn new(literal: impl Into<Literal>, dtype: Option<DataType>) -> Result<Self, TensorError> {
        Self::from_literal(&literal.into(), dtype)
    }

    pub fn from_literal(literal: &Literal, dtype: Option<DataType>) -> Result<Self, TensorError> {
        let shape = infer_shape(literal)?;
        let leaves = literal.leaves();
        let dtype = match dtype {
            Some(dtype) => dtype,
            None => infer_dtype_of(&leaves)?,
        };
        let data = TensorData::from_leaves(dtype, &leaves)?;
        Ok(Self { dtype, shape, data })
    }

    #[inline]
    pub const fn dtype(&self) -> DataType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.dtype.size()
    }

    #[inline]
    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn data(&self) -> &TensorData {
        &self.data
    }

    #[inline]
    pub fn strides(&self) -> Vec<usize> {
        shape::strides(&self.shape)
    }

    /// Dimension sizes as the native runtime takes them.
    pub fn dims_i64(&self) -> Vec<i64> {
        self.shape.iter().map(|&d| d as i64).collect()
    }

    /// Element at a 1-based coordinate, one per axis.
    pub fn getval(&self, index: &[usize]) -> Result<Literal, TensorError> {
        let offset = shape::offset(&self.shape, index)?;
        self.data.get(offset).ok_or_else(|| {
            ShapeError::IndexOutOfRange {
                axis: 0,
                value: offset + 1,
                size: self.data.len(),
            }
            .into()
        })
    }
}

/// Data type a literal would be stored as without an explicit one.
pub fn infer_dtype(literal: &Literal) -> Result<DataType, TypeMismatch> {
    infer_dtype_of(&literal.leaves())
}

fn infer_dtype_of(leaves: &[&Literal]) -> Result<DataType, TypeMismatch> {
    let mut kinds = leaves.iter().map(|leaf| leaf.kind()).enumerate();
    let Some((_, first)) = kinds.next() else {
        return Ok(DataType::Float64);
    };

    let mut dtype = match first {
        Kind::Int => DataType::Int64,
        Kind::Float => DataType::Float64,
        Kind::Str => DataType::String,
        Kind::Bool => DataType::Bool,
        Kind::Complex => DataType::Complex128,
        Kind::Seq => return Ok(DataType::Float64),
    };
    for (index, kind) in kinds {
        if first.is_numeric() && kind.is_numeric() {
            if kind == Kind::Float {
                dtype = DataType::Float64
            }
        } else if kind != first {
            return Err(TypeMismatch::MixedKinds {
                index,
                expected: first,
                found: kind,
            });
        }
    }
    Ok(dtype)
}

impl TensorData {
    fn from_leaves(dtype: DataType, leaves: &[&Literal]) -> Result<Self, TypeMismatch> {
        fn collect<T>(
            dtype: DataType,
            leaves: &[&Literal],
            f: impl Fn(&Literal) -> Option<T>,
        ) -> Result<Vec<T>, TypeMismatch> {
            leaves
                .iter()
                .enumerate()
                .map(|(index, &leaf)| {
                    f(leaf).ok_or_else(|| TypeMismatch::NotRepresentable {
                        index,
                        dtype,
                        found: leaf.kind(),
                    })
                })
                .collect()
        }

        use Literal as L;
        Ok(match dtype {
            DataType::Int32 => Self::Int32(collect(dtype, leaves, |l| match l {
                &L::Int(v) => i32::try_from(v).ok(),
                _ => None,
            })?),
            DataType::Int64 => Self::Int64(collect(dtype, leaves, |l| match l {
                &L::Int(v) => Some(v),
                _ => None,
            })?),
            DataType::Float32 => Self::Float32(collect(dtype, leaves, |l| match l {
                &L::Int(v) => exact_f32(v),
                &L::Float(v) => narrow_f32(v),
                _ => None,
            })?),
            DataType::Float64 => Self::Float64(collect(dtype, leaves, |l| match l {
                &L::Int(v) => exact_f64(v),
                &L::Float(v) => Some(v),
                _ => None,
            })?),
            DataType::String => Self::String(collect(dtype, leaves, |l| match l {
                L::Str(s) => Some(s.clone()),
                _ => None,
            })?),
            DataType::Bool => Self::Bool(collect(dtype, leaves, |l| match l {
                &L::Bool(b) => Some(b),
                _ => None,
            })?),
            DataType::Complex128 => Self::Complex128(collect(dtype, leaves, |l| match l {
                &L::Complex(c) => Some(c),
                &L::Int(v) => exact_f64(v).map(|re| Complex64::new(re, 0.)),
                &L::Float(v) => Some(Complex64::new(v, 0.)),
                _ => None,
            })?),
        })
    }

    pub fn dtype(&self) -> DataType {
        match self {
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::String(_) => DataType::String,
            Self::Bool(_) => DataType::Bool,
            Self::Complex128(_) => DataType::Complex128,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Complex128(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at a flat offset as a scalar literal.
    pub fn get(&self, i: usize) -> Option<Literal> {
        match self {
            Self::Int32(v) => v.get(i).map(|&x| Literal::Int(x.into())),
            Self::Int64(v) => v.get(i).map(|&x| Literal::Int(x)),
            Self::Float32(v) => v.get(i).map(|&x| Literal::Float(x.into())),
            Self::Float64(v) => v.get(i).map(|&x| Literal::Float(x)),
            Self::String(v) => v.get(i).map(|x| Literal::Str(x.clone())),
            Self::Bool(v) => v.get(i).map(|&x| Literal::Bool(x)),
            Self::Complex128(v) => v.get(i).map(|&x| Literal::Complex(x)),
        }
    }
}
