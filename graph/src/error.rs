use crate::attr::AttrError;
use tf_tensor::TensorError;

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum GraphError {
    #[error("operation type \"{0}\" is not in the registry")]
    UnknownOperation(String),
    #[error("operation \"{op}\": {err}")]
    Attribute {
        op: String,
        #[source]
        err: AttrError,
    },
    #[error("an operation named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("input #{position} of operation \"{op}\" {reason}")]
    InvalidInput {
        op: String,
        position: usize,
        reason: &'static str,
    },
    #[error(
        "operation \"{op}\" takes {expected} inputs and {expected_lists} input lists, \
         got {found} and {found_lists}"
    )]
    InputArity {
        op: String,
        expected: usize,
        found: usize,
        expected_lists: usize,
        found_lists: usize,
    },
    #[error("operation \"{op}\" has no attribute \"{attr}\" in its definition")]
    UnknownAttribute { op: String, attr: String },
    #[error("operation \"{op}\" is missing required attribute \"{attr}\"")]
    MissingAttribute { op: String, attr: String },
    #[error("operation \"{op}\": attribute \"{attr}\" does not match the {len} elements of input list \"{arg}\"")]
    ListLength {
        op: String,
        arg: String,
        attr: String,
        len: usize,
    },
    #[error("operation \"{0}\" declares no outputs")]
    NoOutput(String),
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
