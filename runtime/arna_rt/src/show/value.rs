//! Strongly-typed runtime values.
//!
//! The renderer walks [`Value`] trees, never caller memory; translating the
//! embedded byte layout into a `Value` is the decoder's job. Safe callers
//! construct values directly and have them checked against the descriptor
//! before rendering.

use super::descriptor::{NodeId, NodeKind, ParsedType};
use super::ShowError;

/// A dynamically typed Arna value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Void,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Fields in declared order.
    Tuple(Vec<Value>),
    /// Row-major flattened array: `extents` holds one dimension size per
    /// rank, outermost first, and `elems` the `e0 * e1 * ...` elements with
    /// the last dimension varying fastest.
    Array { extents: Vec<u64>, elems: Vec<Value> },
}

impl Value {
    /// Overflow-checked product of array extents.
    pub(crate) fn total_extent(extents: &[u64]) -> Option<u64> {
        extents.iter().try_fold(1u64, |acc, &e| acc.checked_mul(e))
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "floating",
            Value::Tuple(_) => "tuple",
            Value::Array { .. } => "array",
        }
    }
}

fn node_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Void => "void",
        NodeKind::Bool => "boolean",
        NodeKind::Int => "integer",
        NodeKind::Float => "floating",
        NodeKind::Array { .. } | NodeKind::NdArray { .. } => "array",
        NodeKind::Tuple { .. } => "tuple",
    }
}

impl ParsedType {
    /// Check that `value` structurally conforms to this descriptor.
    ///
    /// The safe render path runs this before producing any output, so the
    /// declared-type-matches-data contract is verified, not trusted.
    pub fn check_value(&self, value: &Value) -> Result<(), ShowError> {
        self.check_node(self.root(), value)
    }

    fn check_node(&self, id: NodeId, value: &Value) -> Result<(), ShowError> {
        let kind = self.arena().kind(id);
        match (kind, value) {
            (NodeKind::Void, Value::Void)
            | (NodeKind::Bool, Value::Bool(_))
            | (NodeKind::Int, Value::Int(_))
            | (NodeKind::Float, Value::Float(_)) => Ok(()),
            (NodeKind::Tuple { arity }, Value::Tuple(fields)) => {
                if fields.len() != arity {
                    return Err(ShowError::TypeMismatch {
                        expected: "tuple",
                        got: "tuple of different arity",
                    });
                }
                for (i, field) in fields.iter().enumerate() {
                    self.check_node(self.arena().tuple_field(id, i), field)?;
                }
                Ok(())
            }
            (NodeKind::Array { elem }, Value::Array { extents, elems }) => {
                self.check_array(elem, 1, extents, elems)
            }
            (NodeKind::NdArray { rank, elem }, Value::Array { extents, elems }) => {
                self.check_array(elem, rank as usize, extents, elems)
            }
            _ => Err(ShowError::TypeMismatch {
                expected: node_name(kind),
                got: value.kind_name(),
            }),
        }
    }

    fn check_array(
        &self,
        elem: NodeId,
        rank: usize,
        extents: &[u64],
        elems: &[Value],
    ) -> Result<(), ShowError> {
        if extents.len() != rank {
            return Err(ShowError::TypeMismatch {
                expected: "array",
                got: "array of different rank",
            });
        }
        // Shape errors must surface here, before the renderer has written
        // anything, to keep the all-or-nothing output contract.
        let declared = Value::total_extent(extents).ok_or(ShowError::ArrayTooLarge)?;
        if declared != elems.len() as u64 {
            return Err(ShowError::ShapeMismatch {
                declared,
                got: elems.len(),
            });
        }
        for e in elems {
            self.check_node(elem, e)?;
        }
        Ok(())
    }
}
