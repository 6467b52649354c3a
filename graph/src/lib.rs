mod builder;
mod error;
mod graph;
mod op_spec;
mod operation;
mod registry;

pub mod attr;

pub use attr::{AttrSpec, AttrType, AttrValue, EncodedAttr};
pub use error::GraphError;
pub use graph::Graph;
pub use op_spec::OpSpec;
pub use operation::{Input, Operation, Output};
pub use registry::{ArgDef, ArgType, AttrDef, AttrKind, OpDef, OpRegistry, RegistryLoadError};
pub use tf_tensor::{DataType, Literal, Tensor};

#[cfg(all(test, feature = "builtin-ops"))]
mod test;
