use crate::{
    ArgDef, AttrDef, AttrKind, DataType, EncodedAttr, Graph, GraphError, Input, Literal, OpDef,
    OpRegistry, OpSpec,
    attr::{AttrError, AttrType},
};
use std::sync::Arc;
use tf_tensor::{ShapeError, TensorError};

fn graph() -> Graph {
    Graph::new(Arc::new(OpRegistry::builtin()))
}

#[test]
fn default_names() {
    let g = graph();
    let names = (0..3)
        .map(|i| g.constant(i, None, None).unwrap().operation().name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Constant_0", "Constant_1", "Constant_2"]);

    assert_eq!(
        g.constant(3, Some("Constant_1"), None).unwrap_err(),
        GraphError::DuplicateName("Constant_1".into())
    );
    assert_eq!(g.len(), 3);

    // taken names are skipped, the counter never goes back
    g.constant(4, Some("Constant_3"), None).unwrap();
    let next = g.constant(5, None, None).unwrap();
    assert_eq!(next.operation().name(), "Constant_4");
    assert_eq!(g.default_name("Constant"), "Constant_5");
    assert_eq!(g.default_name("Add"), "Add_0");
}

#[test]
fn implicit_name_is_op_type() {
    let g = graph();
    let x = g.placeholder("x", DataType::Float32).unwrap();
    let spec = OpSpec::new("Identity")
        .input(x)
        .typed_attr("T", DataType::Float32, AttrType::Type);
    let first = g.add_operation(spec.clone()).unwrap();
    let second = g.add_operation(spec.clone().name("")).unwrap();
    assert_eq!(first.name(), "Identity");
    assert_eq!(second.name(), "Identity_0");
    assert_ne!(first, second);
}

#[test]
fn atomic_add() {
    let g = graph();
    let x = g.placeholder("x", DataType::Int64).unwrap();

    let err = g
        .add_operation(
            OpSpec::new("AddN")
                .name("sum")
                .input_list([x.clone(), x.clone()])
                .attr("N", 2),
        )
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::Attribute {
            op: "sum".into(),
            err: AttrError::Unresolved { attr: "N".into() },
        }
    );
    assert!(g.operation("sum").is_none());

    let err = g
        .add_operation(
            OpSpec::new("MatMul")
                .name("mm")
                .input(x.clone())
                .input(x.clone())
                .typed_attr("T", DataType::Int64, AttrType::Type)
                .attr("transpose_a", true),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::Attribute {
            err: AttrError::Unsupported { .. },
            ..
        }
    ));
    assert!(g.operation("mm").is_none());
    assert_eq!(g.len(), 1);

    // the failed names stay free
    let sum = g
        .add_operation(
            OpSpec::new("AddN")
                .name("sum")
                .input_list([x.clone(), x])
                .typed_attr("N", 2, AttrType::Int64)
                .typed_attr("T", DataType::Int64, AttrType::Type),
        )
        .unwrap();
    assert_eq!(g.operation("sum"), Some(sum));
}

#[test]
fn placeholder_feeds_another_operation() {
    let g = graph();
    g.placeholder("x", DataType::Float64).unwrap();

    let x = g.operation("x").unwrap();
    assert_eq!(x.op_type(), "Placeholder");
    assert_eq!(x.attr("dtype"), Some(&EncodedAttr::Type(DataType::Float64)));
    assert_eq!(x.num_outputs(), 1);
    assert!(x.output(1).is_none());

    let out = x.output(0).unwrap();
    assert_eq!(out.to_string(), "x:0");
    let y = g
        .add_operation(
            OpSpec::new("Identity")
                .name("y")
                .input(out.clone())
                .typed_attr("T", DataType::Float64, AttrType::Type),
        )
        .unwrap();
    assert_eq!(y.inputs(), [Input::Single(out)]);
    assert_eq!(y.inputs()[0], Input::Single(x.output(0).unwrap()));
    assert_eq!(g.operations(), [x, y.clone()]);
    assert_eq!(y.graph().map(|g| g.len()), Some(2));
}

#[test]
fn op_type_lookup() {
    let g = graph();
    assert_eq!(
        g.add_operation(OpSpec::new("Conv9D")).unwrap_err(),
        GraphError::UnknownOperation("Conv9D".into())
    );
    assert!(g.is_empty());

    let x = g.placeholder("x", DataType::Int32).unwrap();
    let id = g
        .add_operation(
            OpSpec::new("IDENTITY")
                .input(x)
                .typed_attr("T", DataType::Int32, AttrType::Type),
        )
        .unwrap();
    assert_eq!(id.op_type(), "Identity");
    assert_eq!(id.name(), "IDENTITY");
}

#[test]
fn input_order() {
    let g = graph();
    let a = g.constant("a", None, None).unwrap();
    let b = g.constant("b", None, None).unwrap();
    let c = g.constant("c", None, None).unwrap();
    let join = g
        .add_operation(
            OpSpec::new("StringJoin")
                .input_list([c.clone(), a.clone(), b.clone()])
                .attr("separator", ", "),
        )
        .unwrap();
    assert_eq!(
        join.inputs(),
        [Input::List(vec![c.clone(), a.clone(), b.clone()])]
    );
    assert_eq!(join.attr("separator"), Some(&EncodedAttr::String(", ".into())));
    assert_eq!(join.attr("N"), Some(&EncodedAttr::Int64(3)));

    let builtin = OpRegistry::builtin();
    let registry = OpRegistry::load(builtin.iter().cloned().chain([gather_def()])).unwrap();
    let g = Graph::new(Arc::new(registry));
    let a = g.constant(1, None, None).unwrap();
    let b = g.constant(2, None, None).unwrap();
    let c = g.constant(3, None, None).unwrap();
    let gather = g
        .add_operation(
            OpSpec::new("Gather")
                .input_list([c.clone(), a.clone()])
                .input_list([b.clone()])
                .input(a.clone())
                .typed_attr("T", DataType::Int64, AttrType::Type),
        )
        .unwrap();
    // singles first, then lists in the order given
    assert_eq!(
        gather.inputs(),
        [
            Input::Single(a.clone()),
            Input::List(vec![c, a]),
            Input::List(vec![b]),
        ]
    );
    assert_eq!(gather.attr("N"), Some(&EncodedAttr::Int64(2)));
    assert_eq!(gather.attr("M"), Some(&EncodedAttr::Int64(1)));
    assert_eq!(gather.attr("separator"), Some(&EncodedAttr::String("/".into())));
}

fn gather_def() -> OpDef {
    OpDef::new("Gather")
        .input(ArgDef::typed_by("x", "T"))
        .input(ArgDef::typed_by("xs", "T").list_of("N"))
        .input(ArgDef::typed_by("ys", "T").list_of("M"))
        .output(ArgDef::typed_by("out", "T"))
        .attr(AttrDef::new("T", AttrKind::Type))
        .attr(AttrDef::new("N", AttrKind::Int))
        .attr(AttrDef::new("M", AttrKind::Int))
        .attr(AttrDef::new("separator", AttrKind::String).with_default("/"))
}

#[test]
fn required_attributes() {
    let g = graph();
    assert_eq!(
        g.add_operation(OpSpec::new("Placeholder").name("p")).unwrap_err(),
        GraphError::MissingAttribute {
            op: "p".into(),
            attr: "dtype".into(),
        }
    );
    assert_eq!(
        g.add_operation(
            OpSpec::new("Const")
                .name("c")
                .typed_attr("dtype", DataType::Int64, AttrType::Type)
        )
        .unwrap_err(),
        GraphError::MissingAttribute {
            op: "c".into(),
            attr: "value".into(),
        }
    );
    assert!(g.is_empty());
}

#[test]
fn declared_defaults() {
    let g = graph();
    let dims = g.constant([2, 3], None, Some(DataType::Int32)).unwrap();
    let value = g.constant(0.5, None, None).unwrap();
    let fill = g
        .add_operation(
            OpSpec::new("Fill")
                .input(dims)
                .input(value.clone())
                .typed_attr("T", DataType::Float64, AttrType::Type),
        )
        .unwrap();
    assert_eq!(
        fill.attr("index_type"),
        Some(&EncodedAttr::Type(DataType::Int32))
    );

    // bool defaults have no encoding and stay unset
    let mm = g
        .add_operation(
            OpSpec::new("MatMul")
                .input(value.clone())
                .input(value)
                .typed_attr("T", DataType::Float64, AttrType::Type),
        )
        .unwrap();
    assert!(mm.attr("transpose_a").is_none());
    assert_eq!(mm.attrs().len(), 1);
}

#[test]
fn input_arity() {
    let g = graph();
    let x = g.placeholder("x", DataType::Float32).unwrap();
    let t = |spec: OpSpec| spec.typed_attr("T", DataType::Float32, AttrType::Type);

    assert_eq!(
        g.add_operation(t(OpSpec::new("Identity").name("id"))).unwrap_err(),
        GraphError::InputArity {
            op: "id".into(),
            expected: 1,
            found: 0,
            expected_lists: 0,
            found_lists: 0,
        }
    );
    assert!(matches!(
        g.add_operation(t(OpSpec::new("Identity").input(x.clone()).input(x.clone()))),
        Err(GraphError::InputArity { found: 2, .. })
    ));
    assert!(matches!(
        g.add_operation(t(OpSpec::new("Identity").input_list([x.clone()]))),
        Err(GraphError::InputArity {
            found: 0,
            found_lists: 1,
            ..
        })
    ));
    assert!(matches!(
        g.add_operation(t(OpSpec::new("AddN").input(x.clone()))),
        Err(GraphError::InputArity {
            expected: 0,
            expected_lists: 1,
            ..
        })
    ));
    assert_eq!(g.len(), 1);
}

#[test]
fn undeclared_attribute() {
    let g = graph();
    let x = g.placeholder("x", DataType::Float32).unwrap();
    assert_eq!(
        g.add_operation(
            OpSpec::new("Identity")
                .name("id")
                .input(x)
                .typed_attr("T", DataType::Float32, AttrType::Type)
                .typed_attr("not_an_attr", 1, AttrType::Int64)
        )
        .unwrap_err(),
        GraphError::UnknownAttribute {
            op: "id".into(),
            attr: "not_an_attr".into(),
        }
    );
    assert!(!g.contains("id"));
    assert_eq!(g.len(), 1);
}

#[test]
fn list_length_attribute() {
    let g = graph();
    let x = g.placeholder("x", DataType::Int32).unwrap();
    let add_n = |n: Option<i64>| {
        let spec = OpSpec::new("AddN")
            .input_list([x.clone(), x.clone(), x.clone()])
            .typed_attr("T", DataType::Int32, AttrType::Type);
        match n {
            Some(n) => spec.typed_attr("N", n, AttrType::Int32),
            None => spec,
        }
    };

    assert_eq!(
        g.add_operation(add_n(Some(2)).name("bad")).unwrap_err(),
        GraphError::ListLength {
            op: "bad".into(),
            arg: "inputs".into(),
            attr: "N".into(),
            len: 3,
        }
    );
    let given = g.add_operation(add_n(Some(3))).unwrap();
    assert_eq!(given.attr("N"), Some(&EncodedAttr::Int32(3)));
    let inferred = g.add_operation(add_n(None)).unwrap();
    assert_eq!(inferred.attr("N"), Some(&EncodedAttr::Int64(3)));
    assert_eq!(g.len(), 3);
}

#[test]
fn foreign_input_rejected() {
    let registry = Arc::new(OpRegistry::builtin());
    let g = Graph::new(registry.clone());
    let other = Graph::new(registry);
    let y = other.placeholder("y", DataType::Bool).unwrap();
    let x = g.placeholder("x", DataType::Bool).unwrap();

    let err = g
        .add_operation(
            OpSpec::new("Add")
                .name("z")
                .input(x)
                .input(y)
                .typed_attr("T", DataType::Bool, AttrType::Type),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::InvalidInput { position: 1, .. }
    ));
    assert!(!g.contains("z"));
    assert!(!other.contains("z"));
}

#[test]
fn constant_attributes() {
    let g = graph();
    let c = g
        .constant([[1, 2], [3, 4]], Some("c"), Some(DataType::Int32))
        .unwrap();
    let op = c.operation();
    assert_eq!(op.op_type(), "Const");
    assert_eq!(op.attr("dtype"), Some(&EncodedAttr::Type(DataType::Int32)));
    let Some(EncodedAttr::Tensor(value)) = op.attr("value") else {
        panic!("value is not a tensor")
    };
    assert_eq!(value.shape(), [2, 2]);
    assert_eq!(value.getval(&[2, 1]), Ok(Literal::Int(3)));

    let err = g
        .constant(vec![vec![1, 2], vec![3]], None, None)
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::Tensor(TensorError::Shape(ShapeError::Irregular { .. }))
    ));
    assert_eq!(g.len(), 1);
}
