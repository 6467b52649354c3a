use crate::{
    Graph, GraphError, Input, OpDef, OpSpec, Operation, Output,
    attr::{self, AttrError, AttrSpec, EncodedAttr},
    operation::Node,
};
use std::mem::take;

impl Graph {
    /// Checks `spec` against its registry definition, encodes its attributes
    /// and adds it as a finished node. On failure the graph is left as it was.
    ///
    /// Undeclared attributes are rejected. Missing length attributes of list
    /// arguments are set from the lists, and other missing attributes from
    /// their declared defaults.
    pub fn add_operation(&self, spec: OpSpec) -> Result<Operation, GraphError> {
        let OpSpec {
            op_type,
            name,
            inputs,
            input_lists,
            attrs,
        } = spec;

        let registry = self.registry();
        let def = registry
            .lookup(&op_type)
            .ok_or_else(|| GraphError::UnknownOperation(op_type.clone()))?;

        let name = match name.filter(|name| !name.is_empty()) {
            Some(name) if self.contains(&name) => return Err(GraphError::DuplicateName(name)),
            Some(name) => name,
            None if self.contains(&op_type) => self.default_name(&op_type),
            None => op_type,
        };

        let mut desc = OperationDescription::new(name, def);
        desc.check_arity(inputs.len(), input_lists.len())?;
        for input in inputs {
            desc.add_input(self, input)?
        }
        for list in input_lists {
            desc.add_input_list(self, list)?
        }
        for (name, spec) in &attrs {
            desc.set_attr(name, spec)?
        }
        desc.set_list_lengths()?;
        desc.set_defaults()?;
        Ok(desc.finish(self))
    }
}

/// 构建中的节点，完成前不进入图
struct OperationDescription<'a> {
    name: String,
    def: &'a OpDef,
    inputs: Vec<Input>,
    attrs: Vec<(String, EncodedAttr)>,
    finished: bool,
}

impl<'a> OperationDescription<'a> {
    fn new(name: String, def: &'a OpDef) -> Self {
        Self {
            name,
            def,
            inputs: Vec::new(),
            attrs: Vec::new(),
            finished: false,
        }
    }

    /// Single inputs fill the plain arguments, input lists the list arguments.
    fn check_arity(&self, found: usize, found_lists: usize) -> Result<(), GraphError> {
        let expected_lists = self.def.list_args().count();
        let expected = self.def.input_args.len() - expected_lists;
        if (found, found_lists) == (expected, expected_lists) {
            Ok(())
        } else {
            Err(GraphError::InputArity {
                op: self.name.clone(),
                expected,
                found,
                expected_lists,
                found_lists,
            })
        }
    }

    fn check(&self, graph: &Graph, output: &Output) -> Result<(), GraphError> {
        if output.operation().belongs_to(&graph.0) {
            Ok(())
        } else {
            Err(GraphError::InvalidInput {
                op: self.name.clone(),
                position: self.inputs.len(),
                reason: "comes from another graph",
            })
        }
    }

    fn add_input(&mut self, graph: &Graph, output: Output) -> Result<(), GraphError> {
        self.check(graph, &output)?;
        self.inputs.push(Input::Single(output));
        Ok(())
    }

    fn add_input_list(&mut self, graph: &Graph, list: Vec<Output>) -> Result<(), GraphError> {
        for output in &list {
            self.check(graph, output)?
        }
        self.inputs.push(Input::List(list));
        Ok(())
    }

    fn set_attr(&mut self, name: &str, spec: &AttrSpec) -> Result<(), GraphError> {
        let Some(declared) = self.def.find_attr(name) else {
            return Err(GraphError::UnknownAttribute {
                op: self.name.clone(),
                attr: name.into(),
            });
        };
        let encoded =
            attr::encode(name, spec, Some(declared.kind)).map_err(|err| GraphError::Attribute {
                op: self.name.clone(),
                err,
            })?;
        self.attrs.push((name.into(), encoded));
        Ok(())
    }

    /// Sets each list argument's length attribute, or checks the one given.
    fn set_list_lengths(&mut self) -> Result<(), GraphError> {
        let def = self.def;
        let lens = self
            .inputs
            .iter()
            .filter_map(|input| match input {
                Input::List(list) => Some(list.len()),
                Input::Single(_) => None,
            })
            .collect::<Vec<_>>();

        for (arg, len) in def.list_args().zip(lens) {
            let Some(attr) = arg.number_attr.as_deref() else {
                continue;
            };
            let given = self
                .attrs
                .iter()
                .find(|(n, _)| n == attr)
                .map(|(_, a)| match *a {
                    EncodedAttr::Int64(n) => Some(n),
                    EncodedAttr::Int32(n) => Some(n.into()),
                    _ => None,
                });
            match given {
                None => self.attrs.push((attr.into(), EncodedAttr::Int64(len as _))),
                Some(Some(n)) if n == len as i64 => {}
                Some(_) => {
                    return Err(GraphError::ListLength {
                        op: self.name.clone(),
                        arg: arg.name.clone(),
                        attr: attr.into(),
                        len,
                    });
                }
            }
        }
        Ok(())
    }

    /// Fills declared defaults. A declared attribute without value or default
    /// is an error; a default with no wire encoding is left to the runtime.
    fn set_defaults(&mut self) -> Result<(), GraphError> {
        let def = self.def;
        for declared in &def.attrs {
            if self.attrs.iter().any(|(n, _)| *n == declared.name) {
                continue;
            }
            let Some(value) = &declared.default else {
                return Err(GraphError::MissingAttribute {
                    op: self.name.clone(),
                    attr: declared.name.clone(),
                });
            };
            let spec = AttrSpec::untyped(value.clone());
            match attr::encode(&declared.name, &spec, Some(declared.kind)) {
                Ok(encoded) => self.attrs.push((declared.name.clone(), encoded)),
                Err(AttrError::Unresolved { .. } | AttrError::Unsupported { .. }) => {
                    log::debug!(
                        "default of \"{}\" on \"{}\" left to the runtime",
                        declared.name,
                        self.name
                    )
                }
                Err(err) => {
                    return Err(GraphError::Attribute {
                        op: self.name.clone(),
                        err,
                    });
                }
            }
        }
        Ok(())
    }

    fn finish(mut self, graph: &Graph) -> Operation {
        self.finished = true;
        let node = Node {
            name: take(&mut self.name),
            op_type: self.def.name.clone(),
            inputs: take(&mut self.inputs),
            attrs: take(&mut self.attrs),
            num_outputs: self.def.output_args.len(),
        };
        log::debug!(
            "add operation \"{}\" ({}) with {} inputs",
            node.name,
            node.op_type,
            node.inputs.len()
        );
        graph.insert(node)
    }
}

impl Drop for OperationDescription<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("dropping unfinished operation \"{}\"", self.name)
        }
    }
}
