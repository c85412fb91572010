//! Dynamic value printing.
//!
//! The compiler knows every shown value's static type; at run time that
//! type arrives as a descriptor string alongside the raw value bytes. This
//! module turns the pair into canonical text: parse the descriptor into a
//! per-call arena, decode the bytes into a typed [`Value`] tree, then walk
//! the tree writing output. Rendering is all-or-nothing with respect to
//! errors that can be detected up front: a bad descriptor or a
//! non-conforming value produces an `Err` before a single byte is written.
//!
//! The pieces are usable on their own: [`parse_descriptor`] for the type
//! oracle, [`Value`] plus [`render_value`] for values built in safe code,
//! and [`show_value`] for the checked one-shot path. The runtime's FFI
//! surface goes through [`show_raw`], the only entry that touches caller
//! memory.

pub mod descriptor;
mod decode;
mod layout;
mod render;
pub mod value;

use std::io::Write;

use thiserror::Error;

pub use descriptor::{parse_descriptor, DescriptorError, ParsedType};
pub use layout::{REF_WIDTH, SCALAR_WIDTH};
pub use render::render_value;
pub use value::Value;

/// Error from a show operation.
#[derive(Debug, Error)]
pub enum ShowError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    /// The value's structure does not match the descriptor.
    #[error("value does not match its type: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    /// An array's element count disagrees with the product of its extents.
    #[error("array declares {declared} elements but holds {got}")]
    ShapeMismatch { declared: u64, got: usize },
    #[error("overflow when computing total size of array")]
    ArrayTooLarge,
    /// Inline buffer length does not match the type's embedded size.
    #[error("value buffer is {got} bytes, type needs {expected}")]
    BufferSize { expected: usize, got: usize },
    /// The type embeds an array reference, so it cannot be decoded from a
    /// plain byte slice.
    #[error("type is not fully inline")]
    NotInline,
    #[error("failed to write rendered value")]
    Io(#[from] std::io::Error),
}

/// Render a typed value against its descriptor.
///
/// The value is checked for conformance first; nothing is written unless
/// the check passes.
pub fn show_value<W: Write>(descriptor: &str, value: &Value, out: &mut W) -> Result<(), ShowError> {
    let parsed = parse_descriptor(descriptor)?;
    parsed.check_value(value)?;
    render_value(value, out)
}

/// Render the value at `base` against its descriptor.
///
/// Decoding materializes the full value tree before any output, so memory
/// is read exactly once and a decode failure writes nothing.
///
/// # Safety
///
/// `base` must point to a value laid out exactly as the descriptor
/// dictates, and every array reference reachable from it must point to a
/// live row-major element buffer. See [`ParsedType::embedded_size`] for
/// the layout rules.
pub unsafe fn show_raw<W: Write>(
    descriptor: &str,
    base: *const u8,
    out: &mut W,
) -> Result<(), ShowError> {
    let parsed = parse_descriptor(descriptor)?;
    let value = decode::decode_raw(&parsed, parsed.root(), base)?;
    render_value(&value, out)
}

/// Decode a fully inline value from a byte slice.
///
/// Safe counterpart to the decode half of [`show_raw`], for types with no
/// array references. The slice length must equal the type's embedded size.
pub fn from_bytes(parsed: &ParsedType, bytes: &[u8]) -> Result<Value, ShowError> {
    decode::from_bytes(parsed, bytes)
}
