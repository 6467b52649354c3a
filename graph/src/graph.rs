use crate::{
    GraphError, OpRegistry, OpSpec, Operation, Output, attr::AttrType, operation::Node,
};
use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::Arc};
use tf_tensor::{DataType, Literal, Tensor};

/// 计算图
///
/// Cloning yields another handle to the same graph. A graph and its
/// operations stay on the thread that created them.
#[derive(Clone)]
pub struct Graph(pub(crate) Rc<RefCell<Internal>>);

pub(crate) struct Internal {
    registry: Arc<OpRegistry>,
    nodes: Vec<Rc<Node>>,
    names: HashMap<String, usize>,
    defaults: DefaultNames,
}

impl Graph {
    pub fn new(registry: Arc<OpRegistry>) -> Self {
        Self(Rc::new(RefCell::new(Internal {
            registry,
            nodes: Default::default(),
            names: Default::default(),
            defaults: Default::default(),
        })))
    }

    #[inline]
    pub fn registry(&self) -> Arc<OpRegistry> {
        self.0.borrow().registry.clone()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().names.contains_key(name)
    }

    pub fn operation(&self, name: &str) -> Option<Operation> {
        let internal = self.0.borrow();
        match internal.names.get(name) {
            Some(&idx) => Some(self.handle(&internal.nodes[idx])),
            None => {
                log::warn!("no operation named \"{name}\" in the graph");
                None
            }
        }
    }

    /// Finished operations in creation order.
    pub fn operations(&self) -> Vec<Operation> {
        let internal = self.0.borrow();
        internal.nodes.iter().map(|node| self.handle(node)).collect()
    }

    /// Hands out `"{op_type}_{n}"`, advancing the counter of `op_type`.
    /// Names already taken in the graph are skipped.
    pub fn default_name(&self, op_type: &str) -> String {
        let mut internal = self.0.borrow_mut();
        let Internal {
            names, defaults, ..
        } = &mut *internal;
        loop {
            let name = defaults.next(op_type);
            if !names.contains_key(&name) {
                break name;
            }
        }
    }

    /// Adds a `Placeholder` whose `dtype` attribute is `dtype`.
    pub fn placeholder(&self, name: &str, dtype: DataType) -> Result<Output, GraphError> {
        let op = self.add_operation(
            OpSpec::new("Placeholder")
                .name(name)
                .typed_attr("dtype", dtype, AttrType::Type),
        )?;
        first_output(op)
    }

    /// Adds a `Const` holding `value`. Unnamed constants are named
    /// `Constant_0`, `Constant_1`, ...
    pub fn constant(
        &self,
        value: impl Into<Literal>,
        name: Option<&str>,
        dtype: Option<DataType>,
    ) -> Result<Output, GraphError> {
        let tensor = Tensor::new(value, dtype)?;
        let name = match name {
            Some(name) => name.into(),
            None => self.default_name("Constant"),
        };
        let dtype = tensor.dtype();
        let op = self.add_operation(
            OpSpec::new("Const")
                .name(name)
                .typed_attr("dtype", dtype, AttrType::Type)
                .typed_attr("value", tensor, AttrType::Tensor),
        )?;
        first_output(op)
    }

    pub(crate) fn insert(&self, node: Node) -> Operation {
        let mut internal = self.0.borrow_mut();
        let idx = internal.nodes.len();
        let node = Rc::new(node);
        internal.names.insert(node.name.clone(), idx);
        internal.nodes.push(node.clone());
        self.handle(&node)
    }

    fn handle(&self, node: &Rc<Node>) -> Operation {
        Operation {
            node: node.clone(),
            graph: Rc::downgrade(&self.0),
        }
    }
}

fn first_output(op: Operation) -> Result<Output, GraphError> {
    op.output(0)
        .ok_or_else(|| GraphError::NoOutput(op.name().into()))
}

/// 每种算子的默认名字计数器，只增不减
#[derive(Default)]
#[repr(transparent)]
struct DefaultNames(HashMap<String, usize>);

impl DefaultNames {
    fn next(&mut self, op_type: &str) -> String {
        let counter = self.0.entry(op_type.into()).or_insert(0);
        let ans = format!("{op_type}_{counter}");
        *counter += 1;
        ans
    }
}
