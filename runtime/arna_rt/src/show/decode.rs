//! Translation from the embedded byte layout into typed values.
//!
//! This is the explicit boundary where the "memory matches the declared
//! type" contract lives. Everything past it — checking, rendering — works
//! on [`Value`] trees and is safe. Two entry points:
//!
//! - [`from_bytes`]: safe, for values stored entirely inline; the buffer
//!   length is validated against the layout oracle's computed size.
//! - [`decode_raw`]: unsafe, for the FFI path, where arrays reference
//!   externally owned element buffers through embedded pointers.

use super::descriptor::{NodeId, NodeKind, ParsedType};
use super::layout::SCALAR_WIDTH;
use super::value::Value;
use super::ShowError;

/// Decode a value stored entirely inline in `bytes`.
///
/// `bytes` must be exactly as long as the descriptor's embedded size.
/// Types containing arrays are rejected: their element payload lives
/// behind an external reference and cannot be reached from a slice.
pub fn from_bytes(parsed: &ParsedType, bytes: &[u8]) -> Result<Value, ShowError> {
    let expected = parsed.embedded_size(parsed.root());
    if bytes.len() != expected {
        return Err(ShowError::BufferSize {
            expected,
            got: bytes.len(),
        });
    }
    let (value, rest) = take_inline(parsed, parsed.root(), bytes)?;
    debug_assert!(rest.is_empty());
    Ok(value)
}

fn take_inline<'b>(
    parsed: &ParsedType,
    id: NodeId,
    bytes: &'b [u8],
) -> Result<(Value, &'b [u8]), ShowError> {
    match parsed.arena().kind(id) {
        NodeKind::Void => Ok((Value::Void, bytes)),
        NodeKind::Bool => {
            let (cell, rest) = take_scalar(bytes)?;
            Ok((Value::Bool(u64::from_ne_bytes(cell) != 0), rest))
        }
        NodeKind::Int => {
            let (cell, rest) = take_scalar(bytes)?;
            Ok((Value::Int(i64::from_ne_bytes(cell)), rest))
        }
        NodeKind::Float => {
            let (cell, rest) = take_scalar(bytes)?;
            Ok((Value::Float(f64::from_ne_bytes(cell)), rest))
        }
        NodeKind::Tuple { arity } => {
            let mut fields = Vec::with_capacity(arity);
            let mut rest = bytes;
            for i in 0..arity {
                let (field, after) = take_inline(parsed, parsed.arena().tuple_field(id, i), rest)?;
                fields.push(field);
                rest = after;
            }
            Ok((Value::Tuple(fields), rest))
        }
        NodeKind::Array { .. } | NodeKind::NdArray { .. } => Err(ShowError::NotInline),
    }
}

fn take_scalar(bytes: &[u8]) -> Result<([u8; SCALAR_WIDTH], &[u8]), ShowError> {
    let (cell, rest) = bytes
        .split_first_chunk::<SCALAR_WIDTH>()
        .ok_or(ShowError::BufferSize {
            expected: SCALAR_WIDTH,
            got: bytes.len(),
        })?;
    Ok((*cell, rest))
}

/// Decode a value laid out at `base` per the layout oracle's rules.
///
/// Reads are unaligned throughout: tuples pack their fields with no
/// padding, so interior scalars land on arbitrary offsets.
///
/// # Safety
///
/// `base` must point to readable memory holding a value of exactly the
/// type at `id`, and every array reference slot reachable from it must
/// hold a valid pointer to a row-major element buffer that stays alive and
/// unmodified for the duration of the call.
pub(crate) unsafe fn decode_raw(
    parsed: &ParsedType,
    id: NodeId,
    base: *const u8,
) -> Result<Value, ShowError> {
    match parsed.arena().kind(id) {
        NodeKind::Void => Ok(Value::Void),
        NodeKind::Bool => Ok(Value::Bool(base.cast::<u64>().read_unaligned() != 0)),
        NodeKind::Int => Ok(Value::Int(base.cast::<i64>().read_unaligned())),
        NodeKind::Float => Ok(Value::Float(base.cast::<f64>().read_unaligned())),
        NodeKind::Tuple { arity } => {
            let mut fields = Vec::with_capacity(arity);
            let mut offset = 0;
            for i in 0..arity {
                let field = parsed.arena().tuple_field(id, i);
                fields.push(decode_raw(parsed, field, base.add(offset))?);
                offset += parsed.embedded_size(field);
            }
            Ok(Value::Tuple(fields))
        }
        NodeKind::Array { elem } => decode_raw_array(parsed, elem, 1, base),
        NodeKind::NdArray { rank, elem } => decode_raw_array(parsed, elem, rank as usize, base),
    }
}

unsafe fn decode_raw_array(
    parsed: &ParsedType,
    elem: NodeId,
    rank: usize,
    base: *const u8,
) -> Result<Value, ShowError> {
    let mut extents = Vec::with_capacity(rank);
    for i in 0..rank {
        extents.push(base.add(i * SCALAR_WIDTH).cast::<u64>().read_unaligned());
    }
    let total = Value::total_extent(&extents).ok_or(ShowError::ArrayTooLarge)?;
    let total = usize::try_from(total).map_err(|_| ShowError::ArrayTooLarge)?;

    let data = base
        .add(rank * SCALAR_WIDTH)
        .cast::<*const u8>()
        .read_unaligned();
    let step = parsed.embedded_size(elem);

    let mut elems = Vec::with_capacity(total);
    for i in 0..total {
        elems.push(decode_raw(parsed, elem, data.add(i * step))?);
    }
    Ok(Value::Array { extents, elems })
}
