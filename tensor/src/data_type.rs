use digit_layout::{DigitLayout, types};
use std::{fmt, str::FromStr};

/// 张量元素类型
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum DataType {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bool,
    Complex128,
}

impl DataType {
    pub const ALL: [Self; 7] = [
        Self::Int32,
        Self::Int64,
        Self::Float32,
        Self::Float64,
        Self::String,
        Self::Bool,
        Self::Complex128,
    ];

    /// Bytes per element. Numeric types take it from their digit layout;
    /// strings occupy one pointer-sized slot.
    pub fn size(self) -> usize {
        match (self, self.layout()) {
            (_, Some(layout)) => layout.nbytes(),
            (Self::Bool, None) => 1,
            (Self::Complex128, None) => 16,
            (_, None) => 8,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Complex128 => "complex128",
        }
    }

    #[inline]
    pub const fn is_fixed_width(self) -> bool {
        !matches!(self, Self::String)
    }

    /// Value of the native runtime's `TF_DataType` enum.
    #[inline]
    pub const fn wire_id(self) -> i32 {
        match self {
            Self::Float32 => 1,
            Self::Float64 => 2,
            Self::Int32 => 3,
            Self::String => 7,
            Self::Int64 => 9,
            Self::Bool => 10,
            Self::Complex128 => 18,
        }
    }

    pub fn from_wire_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.wire_id() == id)
    }

    /// Digit layout of a single numeric element.
    pub fn layout(self) -> Option<DigitLayout> {
        match self {
            Self::Int32 => Some(types::I32),
            Self::Int64 => Some(types::I64),
            Self::Float32 => Some(types::F32),
            Self::Float64 => Some(types::F64),
            Self::String | Self::Bool | Self::Complex128 => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("unknown data type \"{0}\"")]
pub struct UnknownDataType(pub String);

impl FromStr for DataType {
    type Err = UnknownDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int32" => Ok(Self::Int32),
            "int64" => Ok(Self::Int64),
            "float32" | "float" => Ok(Self::Float32),
            "float64" | "double" => Ok(Self::Float64),
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            "complex" | "complex128" => Ok(Self::Complex128),
            _ => Err(UnknownDataType(s.into())),
        }
    }
}

#[test]
fn test_wire_id() {
    for ty in DataType::ALL {
        assert_eq!(DataType::from_wire_id(ty.wire_id()), Some(ty));
        assert_eq!(ty.name().parse::<DataType>(), Ok(ty));
    }
    assert_eq!(DataType::from_wire_id(0), None);
    assert_eq!("complex".parse::<DataType>(), Ok(DataType::Complex128));
    assert!("int8".parse::<DataType>().is_err());
}

#[test]
fn test_layout() {
    assert!(DataType::Float32.layout() == Some(types::F32));
    assert!(DataType::Int64.layout() == Some(types::I64));
    assert!(DataType::String.layout().is_none());
    assert!(!DataType::String.is_fixed_width());
    assert_eq!(DataType::Complex128.size(), 16);

    let sizes = DataType::ALL.map(DataType::size);
    assert_eq!(sizes, [4, 8, 4, 8, 8, 1, 16]);
}
