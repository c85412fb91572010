//! Embedded byte layout of shown values.
//!
//! The code generator lays values out with these exact rules, and the
//! decoder walks caller memory with the sizes computed here. There is no
//! caching: the type tree is rebuilt per render call, so memoizing across
//! calls would have nothing to attach to.

use super::descriptor::{NodeId, NodeKind, ParsedType};

/// Width of every scalar cell: bool, int, and float all occupy eight bytes.
///
/// Historical snapshots of the runtime disagreed on the boolean cell width
/// (platform-sized vs. four bytes); eight bytes is the canonical choice,
/// matching the integer cell.
pub const SCALAR_WIDTH: usize = 8;

/// Width of the reference slot at the end of an array's embedded form.
pub const REF_WIDTH: usize = std::mem::size_of::<*const u8>();

impl ParsedType {
    /// Exact embedded size in bytes of a value of the node at `id`.
    ///
    /// - Void occupies no bytes.
    /// - Scalars occupy one fixed-width cell ([`SCALAR_WIDTH`]).
    /// - Arrays embed one `u64` extent per rank followed by a reference to
    ///   the externally owned element buffer; the elements themselves are
    ///   not inlined.
    /// - Tuple fields are packed contiguously in declared order, no padding.
    pub fn embedded_size(&self, id: NodeId) -> usize {
        match self.arena().kind(id) {
            NodeKind::Void => 0,
            NodeKind::Bool | NodeKind::Int | NodeKind::Float => SCALAR_WIDTH,
            NodeKind::Array { .. } => SCALAR_WIDTH + REF_WIDTH,
            NodeKind::NdArray { rank, .. } => rank as usize * SCALAR_WIDTH + REF_WIDTH,
            NodeKind::Tuple { arity } => (0..arity)
                .map(|i| self.embedded_size(self.arena().tuple_field(id, i)))
                .sum(),
        }
    }
}
