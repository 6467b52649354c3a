use crate::{
    Output,
    attr::{AttrSpec, AttrType, AttrValue},
};

/// 待添加到图中的节点描述
#[derive(Clone, Default, Debug)]
pub struct OpSpec {
    pub op_type: String,
    /// Falls back to the op type, then to a default name, when absent or empty.
    pub name: Option<String>,
    pub inputs: Vec<Output>,
    pub input_lists: Vec<Vec<Output>>,
    pub attrs: Vec<(String, AttrSpec)>,
}

impl OpSpec {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn input(mut self, input: Output) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn input_list(mut self, list: impl IntoIterator<Item = Output>) -> Self {
        self.input_lists.push(list.into_iter().collect());
        self
    }

    /// Sets an attribute whose encoding is left to resolution.
    pub fn attr(self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attr_spec(name, AttrSpec::untyped(value))
    }

    pub fn typed_attr(self, name: impl Into<String>, value: impl Into<AttrValue>, ty: AttrType) -> Self {
        self.attr_spec(name, AttrSpec::typed(value, ty))
    }

    /// A later value for the same name replaces the earlier one in place.
    pub fn attr_spec(mut self, name: impl Into<String>, spec: AttrSpec) -> Self {
        let name = name.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = spec,
            None => self.attrs.push((name, spec)),
        }
        self
    }
}

#[test]
fn test_attr_replace() {
    let spec = OpSpec::new("Cast")
        .attr("SrcT", tf_tensor::DataType::Int32)
        .typed_attr("Truncate", 0, AttrType::Int32)
        .typed_attr("SrcT", 9, AttrType::Type);
    assert_eq!(spec.attrs.len(), 2);
    assert_eq!(spec.attrs[0].0, "SrcT");
    assert_eq!(spec.attrs[0].1, AttrSpec::typed(9, AttrType::Type));
    assert!(spec.name.is_none());
}
