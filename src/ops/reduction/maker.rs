//! Declarative attribute and documentation metadata for the four reduction
//! operators.
//!
//! One table row per operator replaces per-operator maker classes: the
//! registry, the attribute validators, and the documentation generator all
//! read from here. Doc strings are produced by substituting two placeholders
//! into a shared immutable template at registration time.

use super::op::ReduceKind;

/// Typed default value of an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Bool(bool),
}

/// One entry of the validated attribute schema consumed by the graph builder
/// when an operator node is instantiated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttrSchema {
    pub name: &'static str,
    pub default: AttrValue,
    pub doc: &'static str,
}

/// The attribute schema shared by every operator in the family.
pub const REDUCE_ATTRS: [AttrSchema; 2] = [
    AttrSchema {
        name: "dim",
        default: AttrValue::Int(0),
        doc: "(int, default 0) The dimension to reduce. \
              Must be in the range [-rank(input), rank(input)). \
              If `dim < 0`, the dim to reduce is `rank + dim`. \
              Noting that reducing on the first dim will make the LoD info lost.",
    },
    AttrSchema {
        name: "keep_dim",
        default: AttrValue::Bool(false),
        doc: "(bool, default false) If true, retain the reduced dimension with length 1.",
    },
];

pub const INPUT_DOC: &str =
    "(Tensor) The input tensor. Tensors with rank at most 6 are supported";
pub const OUTPUT_DOC: &str = "(Tensor) The result tensor.";

const COMMENT_TEMPLATE: &str = "{ReduceOp} operator computes the {reduce} of the input tensor \
along the given dimension. The result tensor has 1 fewer dimension than the input unless \
`keep_dim` is true.";

/// Static metadata of one reduction operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOpMeta {
    pub kind: ReduceKind,
    /// Registered operator name, e.g. `reduce_sum`.
    pub name: &'static str,
    /// Registered gradient operator name, e.g. `reduce_sum_grad`.
    pub grad_name: &'static str,
    /// Display name substituted into the doc template, e.g. `ReduceSum`.
    pub display_name: &'static str,
    /// Reduction word substituted into the doc template, e.g. `sum`.
    pub reduce_word: &'static str,
}

/// Every operator of the family, in registration order.
pub const REDUCE_OP_TABLE: [ReduceOpMeta; 4] = [
    ReduceOpMeta {
        kind: ReduceKind::Sum,
        name: "reduce_sum",
        grad_name: "reduce_sum_grad",
        display_name: "ReduceSum",
        reduce_word: "sum",
    },
    ReduceOpMeta {
        kind: ReduceKind::Mean,
        name: "reduce_mean",
        grad_name: "reduce_mean_grad",
        display_name: "ReduceMean",
        reduce_word: "mean",
    },
    ReduceOpMeta {
        kind: ReduceKind::Max,
        name: "reduce_max",
        grad_name: "reduce_max_grad",
        display_name: "ReduceMax",
        reduce_word: "max",
    },
    ReduceOpMeta {
        kind: ReduceKind::Min,
        name: "reduce_min",
        grad_name: "reduce_min_grad",
        display_name: "ReduceMin",
        reduce_word: "min",
    },
];

/// Looks up the table row for `kind`.
pub fn meta(kind: ReduceKind) -> &'static ReduceOpMeta {
    // The table covers every variant, so the lookup cannot fail.
    REDUCE_OP_TABLE
        .iter()
        .find(|m| m.kind == kind)
        .unwrap_or(&REDUCE_OP_TABLE[0])
}

/// The registrable descriptor of one operator: name, bindings, attribute
/// schema, and generated documentation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpDescriptor {
    pub name: &'static str,
    pub grad_name: &'static str,
    pub input: (&'static str, &'static str),
    pub output: (&'static str, &'static str),
    pub attrs: &'static [AttrSchema],
    pub comment: String,
}

/// Builds the descriptor for one table row, substituting the doc template.
pub fn descriptor(meta: &ReduceOpMeta) -> OpDescriptor {
    let comment = COMMENT_TEMPLATE
        .replace("{ReduceOp}", meta.display_name)
        .replace("{reduce}", meta.reduce_word);
    OpDescriptor {
        name: meta.name,
        grad_name: meta.grad_name,
        input: ("X", INPUT_DOC),
        output: ("Out", OUTPUT_DOC),
        attrs: &REDUCE_ATTRS,
        comment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_all_kinds() {
        let kinds: Vec<ReduceKind> = REDUCE_OP_TABLE.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ReduceKind::Sum,
                ReduceKind::Mean,
                ReduceKind::Max,
                ReduceKind::Min
            ]
        );
        for m in &REDUCE_OP_TABLE {
            assert_eq!(meta(m.kind), m);
            assert_eq!(m.grad_name, format!("{}_grad", m.name));
        }
    }

    #[test]
    fn test_attr_schema_defaults() {
        assert_eq!(REDUCE_ATTRS[0].name, "dim");
        assert_eq!(REDUCE_ATTRS[0].default, AttrValue::Int(0));
        assert_eq!(REDUCE_ATTRS[1].name, "keep_dim");
        assert_eq!(REDUCE_ATTRS[1].default, AttrValue::Bool(false));
    }

    #[test]
    fn test_descriptor_substitutes_template() {
        let desc = descriptor(meta(ReduceKind::Sum));
        assert!(desc
            .comment
            .starts_with("ReduceSum operator computes the sum"));
        assert!(!desc.comment.contains('{'), "unsubstituted placeholder");

        let mean = descriptor(meta(ReduceKind::Mean));
        assert!(mean.comment.contains("mean of the input tensor"));
    }
}
