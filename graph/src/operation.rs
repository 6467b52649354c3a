use crate::{Graph, attr::EncodedAttr, graph::Internal};
use std::{
    cell::RefCell,
    fmt, ptr,
    rc::{Rc, Weak},
};

pub(crate) struct Node {
    pub name: String,
    pub op_type: String,
    pub inputs: Vec<Input>,
    pub attrs: Vec<(String, EncodedAttr)>,
    pub num_outputs: usize,
}

/// 图中已完成的节点
#[derive(Clone)]
pub struct Operation {
    pub(crate) node: Rc<Node>,
    pub(crate) graph: Weak<RefCell<Internal>>,
}

/// One output slot of an operation, usable as another operation's input.
#[derive(Clone, PartialEq, Debug)]
pub struct Output {
    op: Operation,
    index: usize,
}

/// An input slot as wired, in the order the operation receives them.
#[derive(Clone, PartialEq, Debug)]
pub enum Input {
    Single(Output),
    List(Vec<Output>),
}

impl Operation {
    #[inline]
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Canonical op type, as spelled by the registry.
    #[inline]
    pub fn op_type(&self) -> &str {
        &self.node.op_type
    }

    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.node.num_outputs
    }

    pub fn output(&self, index: usize) -> Option<Output> {
        (index < self.node.num_outputs).then(|| Output {
            op: self.clone(),
            index,
        })
    }

    pub fn outputs(&self) -> impl Iterator<Item = Output> + '_ {
        (0..self.node.num_outputs).map(|index| Output {
            op: self.clone(),
            index,
        })
    }

    #[inline]
    pub fn inputs(&self) -> &[Input] {
        &self.node.inputs
    }

    #[inline]
    pub fn attrs(&self) -> &[(String, EncodedAttr)] {
        &self.node.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&EncodedAttr> {
        self.node
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a)
    }

    /// The owning graph, if it is still alive.
    pub fn graph(&self) -> Option<Graph> {
        self.graph.upgrade().map(Graph)
    }

    pub(crate) fn belongs_to(&self, graph: &Rc<RefCell<Internal>>) -> bool {
        ptr::eq(self.graph.as_ptr(), Rc::as_ptr(graph))
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.node.name)
            .field("op_type", &self.node.op_type)
            .finish()
    }
}

impl Output {
    #[inline]
    pub fn operation(&self) -> &Operation {
        &self.op
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.op.name(), self.index)
    }
}
