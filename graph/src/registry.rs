use crate::AttrValue;
use std::{collections::HashMap, fmt};
use tf_tensor::DataType;

#[cfg(feature = "builtin-ops")]
mod builtin;

/// 算子定义
#[derive(Clone, PartialEq, Debug)]
pub struct OpDef {
    pub name: String,
    pub input_args: Vec<ArgDef>,
    pub output_args: Vec<ArgDef>,
    pub attrs: Vec<AttrDef>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ArgDef {
    pub name: String,
    pub ty: ArgType,
    /// Attribute holding the length, for list arguments.
    pub number_attr: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ArgType {
    Fixed(DataType),
    /// Element type given by the named `type` attribute.
    Attr(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct AttrDef {
    pub name: String,
    pub kind: AttrKind,
    pub default: Option<AttrValue>,
}

/// Attribute kind as declared by an operation definition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AttrKind {
    String,
    StringList,
    Int,
    IntList,
    Float,
    FloatList,
    Bool,
    Type,
    Tensor,
    Shape,
    Func,
}

impl OpDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn input(mut self, arg: ArgDef) -> Self {
        self.input_args.push(arg);
        self
    }

    pub fn output(mut self, arg: ArgDef) -> Self {
        self.output_args.push(arg);
        self
    }

    pub fn attr(mut self, attr: AttrDef) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn find_attr(&self, name: &str) -> Option<&AttrDef> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// Input arguments fed by a whole list of outputs.
    pub fn list_args(&self) -> impl Iterator<Item = &ArgDef> {
        self.input_args.iter().filter(|arg| arg.is_list())
    }

    /// Every attribute an argument refers to must be declared: a `type`
    /// for its element type, an `int` for its length.
    fn check_args(&self) -> Result<(), RegistryLoadError> {
        for arg in self.input_args.iter().chain(&self.output_args) {
            let type_attr = match &arg.ty {
                ArgType::Attr(name) => Some((name, AttrKind::Type)),
                ArgType::Fixed(_) => None,
            };
            let number_attr = arg.number_attr.as_ref().map(|name| (name, AttrKind::Int));
            for (attr, kind) in type_attr.into_iter().chain(number_attr) {
                if self.find_attr(attr).is_none_or(|a| a.kind != kind) {
                    return Err(RegistryLoadError::ArgAttr {
                        op: self.name.clone(),
                        arg: arg.name.clone(),
                        attr: attr.clone(),
                        kind,
                    });
                }
            }
        }
        Ok(())
    }
}

impl ArgDef {
    pub fn fixed(name: impl Into<String>, dt: DataType) -> Self {
        Self {
            name: name.into(),
            ty: ArgType::Fixed(dt),
            number_attr: None,
        }
    }

    pub fn typed_by(name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ArgType::Attr(attr.into()),
            number_attr: None,
        }
    }

    pub fn list_of(mut self, number_attr: impl Into<String>) -> Self {
        self.number_attr = Some(number_attr.into());
        self
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        self.number_attr.is_some()
    }
}

impl AttrDef {
    pub fn new(name: impl Into<String>, kind: AttrKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::StringList => "list(string)",
            Self::Int => "int",
            Self::IntList => "list(int)",
            Self::Float => "float",
            Self::FloatList => "list(float)",
            Self::Bool => "bool",
            Self::Type => "type",
            Self::Tensor => "tensor",
            Self::Shape => "shape",
            Self::Func => "func",
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum RegistryLoadError {
    #[error("failed to decode operation definitions: {0}")]
    Decode(String),
    #[error("operation definition #{0} has an empty name")]
    EmptyName(usize),
    #[error("operation \"{0}\" is defined more than once")]
    Duplicate(String),
    #[error("attribute \"{attr}\" of \"{op}\" is declared more than once")]
    DuplicateAttr { op: String, attr: String },
    #[error("argument \"{arg}\" of \"{op}\" refers to \"{attr}\", which is not declared with kind {kind}")]
    ArgAttr {
        op: String,
        arg: String,
        attr: String,
        kind: AttrKind,
    },
}

/// Read-only table of known operations, keyed by lower-cased name.
#[derive(Default, Debug)]
pub struct OpRegistry(HashMap<String, OpDef>);

impl OpRegistry {
    pub fn load(defs: impl IntoIterator<Item = OpDef>) -> Result<Self, RegistryLoadError> {
        let mut map = HashMap::new();
        for (i, def) in defs.into_iter().enumerate() {
            if def.name.is_empty() {
                return Err(RegistryLoadError::EmptyName(i));
            }
            for (j, attr) in def.attrs.iter().enumerate() {
                if def.attrs[..j].iter().any(|a| a.name == attr.name) {
                    return Err(RegistryLoadError::DuplicateAttr {
                        op: def.name.clone(),
                        attr: attr.name.clone(),
                    });
                }
            }
            def.check_args()?;
            let key = def.name.to_lowercase();
            if map.contains_key(&key) {
                return Err(RegistryLoadError::Duplicate(def.name));
            }
            map.insert(key, def);
        }
        log::info!("loaded {} operation definitions", map.len());
        Ok(Self(map))
    }

    /// Loads from a decoder that may fail on any record.
    pub fn try_load<E: fmt::Display>(
        defs: impl IntoIterator<Item = Result<OpDef, E>>,
    ) -> Result<Self, RegistryLoadError> {
        let defs = defs
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RegistryLoadError::Decode(e.to_string()))?;
        Self::load(defs)
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&OpDef> {
        self.0.get(&name.to_lowercase())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpDef> {
        self.0.values()
    }
}
