use super::{ArgDef, AttrDef, AttrKind, OpDef, OpRegistry};
use tf_tensor::DataType;

impl OpRegistry {
    /// Definitions of the common operations, for graphs built without an external registry.
    pub fn builtin() -> Self {
        Self(
            builtin_defs()
                .into_iter()
                .map(|def| (def.name.to_lowercase(), def))
                .collect(),
        )
    }
}

pub(super) fn builtin_defs() -> Vec<OpDef> {
    use AttrKind as K;

    let binary = |name: &str, out: &str| {
        OpDef::new(name)
            .input(ArgDef::typed_by("x", "T"))
            .input(ArgDef::typed_by("y", "T"))
            .output(ArgDef::typed_by(out, "T"))
            .attr(AttrDef::new("T", K::Type))
    };

    vec![
        OpDef::new("Const")
            .output(ArgDef::typed_by("output", "dtype"))
            .attr(AttrDef::new("value", K::Tensor))
            .attr(AttrDef::new("dtype", K::Type)),
        OpDef::new("Placeholder")
            .output(ArgDef::typed_by("output", "dtype"))
            .attr(AttrDef::new("dtype", K::Type)),
        OpDef::new("Identity")
            .input(ArgDef::typed_by("input", "T"))
            .output(ArgDef::typed_by("output", "T"))
            .attr(AttrDef::new("T", K::Type)),
        binary("Add", "z"),
        binary("Sub", "z"),
        binary("Mul", "z"),
        OpDef::new("MatMul")
            .input(ArgDef::typed_by("a", "T"))
            .input(ArgDef::typed_by("b", "T"))
            .output(ArgDef::typed_by("product", "T"))
            .attr(AttrDef::new("transpose_a", K::Bool).with_default(false))
            .attr(AttrDef::new("transpose_b", K::Bool).with_default(false))
            .attr(AttrDef::new("T", K::Type)),
        OpDef::new("AddN")
            .input(ArgDef::typed_by("inputs", "T").list_of("N"))
            .output(ArgDef::typed_by("sum", "T"))
            .attr(AttrDef::new("N", K::Int))
            .attr(AttrDef::new("T", K::Type)),
        OpDef::new("Cast")
            .input(ArgDef::typed_by("x", "SrcT"))
            .output(ArgDef::typed_by("y", "DstT"))
            .attr(AttrDef::new("SrcT", K::Type))
            .attr(AttrDef::new("DstT", K::Type))
            .attr(AttrDef::new("Truncate", K::Bool).with_default(false)),
        OpDef::new("Fill")
            .input(ArgDef::typed_by("dims", "index_type"))
            .input(ArgDef::typed_by("value", "T"))
            .output(ArgDef::typed_by("output", "T"))
            .attr(AttrDef::new("T", K::Type))
            .attr(AttrDef::new("index_type", K::Type).with_default(DataType::Int32)),
        OpDef::new("Reshape")
            .input(ArgDef::typed_by("tensor", "T"))
            .input(ArgDef::typed_by("shape", "Tshape"))
            .output(ArgDef::typed_by("output", "T"))
            .attr(AttrDef::new("T", K::Type))
            .attr(AttrDef::new("Tshape", K::Type).with_default(DataType::Int32)),
        OpDef::new("StringJoin")
            .input(ArgDef::fixed("inputs", DataType::String).list_of("N"))
            .output(ArgDef::fixed("output", DataType::String))
            .attr(AttrDef::new("N", K::Int))
            .attr(AttrDef::new("separator", K::String).with_default("")),
    ]
}

#[test]
fn test_builtin() {
    let registry = OpRegistry::builtin();
    assert_eq!(registry.len(), builtin_defs().len());
    // the table passes the same checks as an external one
    assert!(OpRegistry::load(builtin_defs()).is_ok());

    let konst = registry.lookup("const").unwrap();
    assert_eq!(konst.output_args.len(), 1);
    assert_eq!(konst.find_attr("value").map(|a| a.kind), Some(AttrKind::Tensor));
    assert!(registry.lookup("matmul").is_some());
    // shapes have no encoder, so Placeholder only requires its dtype
    let placeholder = registry.lookup("Placeholder").unwrap();
    assert_eq!(placeholder.attrs.len(), 1);
    assert!(registry.lookup("Conv2D").is_none());
}
