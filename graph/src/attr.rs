use crate::AttrKind;
use std::{fmt, str::FromStr, sync::Arc};
use tf_tensor::{
    DataType, Tensor,
    convert::{exact_f32, narrow_f32},
};

/// 属性值，由调用方给出，不区分定宽数值子类型
#[derive(Clone, PartialEq, Debug)]
pub enum AttrValue {
    Str(String),
    Strs(Vec<String>),
    Int(i64),
    Ints(Vec<i64>),
    Float(f64),
    Floats(Vec<f64>),
    Bool(bool),
    Type(DataType),
    Tensor(Arc<Tensor>),
}

impl AttrValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Strs(_) => "string list",
            Self::Int(_) => "integer",
            Self::Ints(_) => "integer list",
            Self::Float(_) => "real",
            Self::Floats(_) => "real list",
            Self::Bool(_) => "boolean",
            Self::Type(_) => "data type",
            Self::Tensor(_) => "tensor",
        }
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for AttrValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

impl_from!(Str: &str, String);
impl_from!(Int: i32, i64, u32);
impl_from!(Float: f32, f64);
impl_from!(Bool: bool);
impl_from!(Type: DataType);
impl_from!(Tensor: Tensor, Arc<Tensor>);
impl_from!(Strs: Vec<String>);
impl_from!(Ints: Vec<i64>);
impl_from!(Floats: Vec<f64>);

impl From<Vec<&str>> for AttrValue {
    fn from(value: Vec<&str>) -> Self {
        Self::Strs(value.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<i32>> for AttrValue {
    fn from(value: Vec<i32>) -> Self {
        Self::Ints(value.into_iter().map(Into::into).collect())
    }
}

/// Wire encoding an attribute resolves to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum AttrType {
    String,
    StringList,
    Int32,
    Int32List,
    Int64,
    Int64List,
    Float32,
    Float32List,
    Type,
    Tensor,
    Bool,
    Shape,
    Func,
}

impl AttrType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::StringList => "string_list",
            Self::Int32 => "int32",
            Self::Int32List => "int32_list",
            Self::Int64 => "int64",
            Self::Int64List => "int64_list",
            Self::Float32 => "float32",
            Self::Float32List => "float32_list",
            Self::Type => "type",
            Self::Tensor => "tensor",
            Self::Bool => "bool",
            Self::Shape => "shape",
            Self::Func => "func",
        }
    }

    /// Whether an encoder exists for this kind.
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Bool | Self::Shape | Self::Func)
    }

    /// The single encoding a declared kind implies, if it is not ambiguous.
    pub const fn from_declared(kind: AttrKind) -> Option<Self> {
        match kind {
            AttrKind::String => Some(Self::String),
            AttrKind::StringList => Some(Self::StringList),
            AttrKind::Float => Some(Self::Float32),
            AttrKind::FloatList => Some(Self::Float32List),
            AttrKind::Type => Some(Self::Type),
            AttrKind::Tensor => Some(Self::Tensor),
            AttrKind::Bool => Some(Self::Bool),
            AttrKind::Shape => Some(Self::Shape),
            AttrKind::Func => Some(Self::Func),
            // int32 or int64
            AttrKind::Int | AttrKind::IntList => None,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("unknown attribute type tag \"{0}\"")]
pub struct UnknownAttrType(pub String);

impl FromStr for AttrType {
    type Err = UnknownAttrType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "string_list" | "string_array" => Ok(Self::StringList),
            "int32" => Ok(Self::Int32),
            "int32_list" | "int32_array" => Ok(Self::Int32List),
            "int64" => Ok(Self::Int64),
            "int64_list" | "int64_array" => Ok(Self::Int64List),
            "float32" => Ok(Self::Float32),
            "float32_list" | "float32_array" => Ok(Self::Float32List),
            "type" | "DataType" => Ok(Self::Type),
            "tensor" | "Tensor" => Ok(Self::Tensor),
            "bool" => Ok(Self::Bool),
            "shape" => Ok(Self::Shape),
            "func" => Ok(Self::Func),
            _ => Err(UnknownAttrType(s.into())),
        }
    }
}

/// A raw attribute value with an optional explicit encoding that overrides inference.
#[derive(Clone, PartialEq, Debug)]
pub struct AttrSpec {
    pub value: AttrValue,
    pub ty: Option<AttrType>,
}

impl AttrSpec {
    pub fn typed(value: impl Into<AttrValue>, ty: AttrType) -> Self {
        Self {
            value: value.into(),
            ty: Some(ty),
        }
    }

    pub fn untyped(value: impl Into<AttrValue>) -> Self {
        Self {
            value: value.into(),
            ty: None,
        }
    }
}

/// Attribute names whose encoding cannot be told from the raw value.
pub static NAME_OVERRIDES: &[(&str, AttrType)] = &[
    ("dtype", AttrType::Type),
    ("value", AttrType::Tensor),
    ("channels", AttrType::Int64),
    ("DstT", AttrType::Type),
    ("size/Const", AttrType::Int32List),
];

pub fn name_override(name: &str) -> Option<AttrType> {
    NAME_OVERRIDES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, ty)| ty)
}

/// Which rule decided an attribute's encoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resolution {
    Explicit,
    NameOverride,
    Declared,
}

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum AttrError {
    #[error("cannot determine the encoding of attribute \"{attr}\"")]
    Unresolved { attr: String },
    #[error("attribute \"{attr}\" resolved to {kind}, which has no encoder")]
    Unsupported { attr: String, kind: AttrType },
    #[error("attribute \"{attr}\" is encoded as {expected} but the value is a {found} it cannot represent")]
    Mismatch {
        attr: String,
        expected: AttrType,
        found: &'static str,
    },
}

/// Decides the encoding of an attribute. The first matching rule wins:
/// explicit tag, then [`NAME_OVERRIDES`], then an unambiguous declared kind.
pub fn resolve(
    name: &str,
    spec: &AttrSpec,
    declared: Option<AttrKind>,
) -> Result<(AttrType, Resolution), AttrError> {
    if let Some(ty) = spec.ty {
        Ok((ty, Resolution::Explicit))
    } else if let Some(ty) = name_override(name) {
        Ok((ty, Resolution::NameOverride))
    } else if let Some(ty) = declared.and_then(AttrType::from_declared) {
        Ok((ty, Resolution::Declared))
    } else {
        Err(AttrError::Unresolved { attr: name.into() })
    }
}

/// 编码后的属性
#[derive(Clone, PartialEq, Debug)]
pub enum EncodedAttr {
    String(String),
    StringList { values: Vec<String>, lengths: Vec<usize> },
    Int32(i32),
    Int32List { values: Vec<i32>, len: usize },
    Int64(i64),
    Int64List { values: Vec<i64>, len: usize },
    Float32(f32),
    Float32List { values: Vec<f32>, len: usize },
    Type(DataType),
    Tensor(Arc<Tensor>),
}

pub fn encode(name: &str, spec: &AttrSpec, declared: Option<AttrKind>) -> Result<EncodedAttr, AttrError> {
    let (ty, how) = resolve(name, spec, declared)?;
    log::trace!("attribute \"{name}\" encoded as {ty} ({how:?})");

    if !ty.is_supported() {
        return Err(AttrError::Unsupported {
            attr: name.into(),
            kind: ty,
        });
    }
    let mismatch = || AttrError::Mismatch {
        attr: name.into(),
        expected: ty,
        found: spec.value.type_name(),
    };

    use AttrValue as V;
    Ok(match (ty, &spec.value) {
        (AttrType::String, V::Str(s)) => EncodedAttr::String(s.clone()),
        (AttrType::StringList, V::Strs(v)) => EncodedAttr::StringList {
            values: v.clone(),
            lengths: v.iter().map(String::len).collect(),
        },
        (AttrType::Int32, &V::Int(i)) => EncodedAttr::Int32(i32::try_from(i).map_err(|_| mismatch())?),
        (AttrType::Int32List, V::Ints(v)) => EncodedAttr::Int32List {
            values: v
                .iter()
                .map(|&i| i32::try_from(i).map_err(|_| mismatch()))
                .collect::<Result<_, _>>()?,
            len: v.len(),
        },
        (AttrType::Int64, &V::Int(i)) => EncodedAttr::Int64(i),
        (AttrType::Int64List, V::Ints(v)) => EncodedAttr::Int64List {
            values: v.clone(),
            len: v.len(),
        },
        (AttrType::Float32, &V::Float(f)) => EncodedAttr::Float32(narrow_f32(f).ok_or_else(mismatch)?),
        (AttrType::Float32, &V::Int(i)) => EncodedAttr::Float32(exact_f32(i).ok_or_else(mismatch)?),
        (AttrType::Float32List, V::Floats(v)) => EncodedAttr::Float32List {
            values: v
                .iter()
                .map(|&f| narrow_f32(f).ok_or_else(mismatch))
                .collect::<Result<_, _>>()?,
            len: v.len(),
        },
        (AttrType::Float32List, V::Ints(v)) => EncodedAttr::Float32List {
            values: v
                .iter()
                .map(|&i| exact_f32(i).ok_or_else(mismatch))
                .collect::<Result<_, _>>()?,
            len: v.len(),
        },
        (AttrType::Type, &V::Type(dt)) => EncodedAttr::Type(dt),
        // the runtime's enum value, as callers of the C API pass it
        (AttrType::Type, &V::Int(id)) => EncodedAttr::Type(
            i32::try_from(id)
                .ok()
                .and_then(DataType::from_wire_id)
                .ok_or_else(mismatch)?,
        ),
        (AttrType::Tensor, V::Tensor(t)) => EncodedAttr::Tensor(t.clone()),
        _ => return Err(mismatch()),
    })
}

impl EncodedAttr {
    pub fn ty(&self) -> AttrType {
        match self {
            Self::String(_) => AttrType::String,
            Self::StringList { .. } => AttrType::StringList,
            Self::Int32(_) => AttrType::Int32,
            Self::Int32List { .. } => AttrType::Int32List,
            Self::Int64(_) => AttrType::Int64,
            Self::Int64List { .. } => AttrType::Int64List,
            Self::Float32(_) => AttrType::Float32,
            Self::Float32List { .. } => AttrType::Float32List,
            Self::Type(_) => AttrType::Type,
            Self::Tensor(_) => AttrType::Tensor,
        }
    }

    /// Deterministic little-endian serialization: a kind tag, then the payload.
    /// Lists carry their length before the elements.
    pub fn to_bytes(&self) -> Vec<u8> {
        fn put_len(buf: &mut Vec<u8>, n: usize) {
            buf.extend((n as u64).to_le_bytes())
        }

        let mut buf = vec![self.ty() as u8];
        match self {
            Self::String(s) => {
                put_len(&mut buf, s.len());
                buf.extend(s.as_bytes())
            }
            Self::StringList { values, lengths } => {
                put_len(&mut buf, values.len());
                for &n in lengths {
                    put_len(&mut buf, n)
                }
                for s in values {
                    buf.extend(s.as_bytes())
                }
            }
            Self::Int32(i) => buf.extend(i.to_le_bytes()),
            Self::Int32List { values, len: n } => {
                put_len(&mut buf, *n);
                values.iter().for_each(|i| buf.extend(i.to_le_bytes()))
            }
            Self::Int64(i) => buf.extend(i.to_le_bytes()),
            Self::Int64List { values, len: n } => {
                put_len(&mut buf, *n);
                values.iter().for_each(|i| buf.extend(i.to_le_bytes()))
            }
            Self::Float32(f) => buf.extend(f.to_le_bytes()),
            Self::Float32List { values, len: n } => {
                put_len(&mut buf, *n);
                values.iter().for_each(|f| buf.extend(f.to_le_bytes()))
            }
            Self::Type(dt) => buf.extend(dt.wire_id().to_le_bytes()),
            Self::Tensor(t) => {
                buf.extend(t.dtype().wire_id().to_le_bytes());
                put_len(&mut buf, t.rank());
                t.dims_i64().iter().for_each(|d| buf.extend(d.to_le_bytes()));
                let data = t.to_native_bytes();
                put_len(&mut buf, data.len());
                buf.extend(data)
            }
        }
        buf
    }
}
