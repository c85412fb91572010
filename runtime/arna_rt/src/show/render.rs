//! Canonical text rendering of typed values.
//!
//! Arrays are printed flat with punctuation encoding the nested structure:
//! a plain `", "` separates elements that differ only in the innermost
//! dimension, and each dimension boundary crossed between two consecutive
//! elements contributes one `;`. A 2x3 array renders as
//! `[1, 2, 3; 4, 5, 6]`; a 2x2x2 array crosses two boundaries at its
//! midpoint and renders `;;` there. This recovers the full bracket nesting
//! without ever nesting brackets.

use std::io::Write;

use super::value::Value;
use super::ShowError;

/// Render `value` to `out`, without a trailing newline.
///
/// Any write failure aborts the whole render with [`ShowError::Io`].
pub fn render_value<W: Write>(value: &Value, out: &mut W) -> Result<(), ShowError> {
    match value {
        Value::Void => out.write_all(b"void")?,
        Value::Bool(true) => out.write_all(b"true")?,
        Value::Bool(false) => out.write_all(b"false")?,
        Value::Int(n) => write!(out, "{n}")?,
        Value::Float(x) => write_float(out, *x)?,
        Value::Tuple(fields) => {
            out.write_all(b"{")?;
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    out.write_all(b", ")?;
                }
                render_value(field, out)?;
            }
            out.write_all(b"}")?;
        }
        Value::Array { extents, elems } => render_array(extents, elems, out)?,
    }
    Ok(())
}

fn render_array<W: Write>(
    extents: &[u64],
    elems: &[Value],
    out: &mut W,
) -> Result<(), ShowError> {
    let declared = Value::total_extent(extents).ok_or(ShowError::ArrayTooLarge)?;
    if declared != elems.len() as u64 {
        return Err(ShowError::ShapeMismatch {
            declared,
            got: elems.len(),
        });
    }

    out.write_all(b"[")?;
    for (i, elem) in elems.iter().enumerate() {
        if i > 0 {
            write_separator(i as u64, extents, out)?;
        }
        render_value(elem, out)?;
    }
    out.write_all(b"]")?;
    Ok(())
}

fn write_separator<W: Write>(i: u64, extents: &[u64], out: &mut W) -> Result<(), ShowError> {
    let crossed = boundary_crossings(i, extents);
    if crossed == 0 {
        out.write_all(b", ")?;
    } else {
        for _ in 0..crossed {
            out.write_all(b";")?;
        }
        out.write_all(b" ")?;
    }
    Ok(())
}

/// Number of dimension boundaries crossed entering flat index `i`.
///
/// Divides `i` by the extents innermost-first for as long as it stays
/// evenly divisible; each successful division is one boundary. Never
/// called with a zero extent (a zero extent means zero elements, so no
/// separator is ever needed), but guarded anyway.
pub(crate) fn boundary_crossings(i: u64, extents: &[u64]) -> usize {
    let mut j = i;
    let mut crossed = 0;
    for &extent in extents.iter().rev() {
        if extent == 0 || j % extent != 0 {
            break;
        }
        j /= extent;
        crossed += 1;
    }
    crossed
}

/// Fixed six-fractional-digit decimal, no exponent, matching the
/// conventional `%f` formatting the toolchain's tests expect.
fn write_float<W: Write>(out: &mut W, x: f64) -> Result<(), ShowError> {
    if x.is_nan() {
        out.write_all(b"nan")?;
    } else if x.is_infinite() {
        write!(out, "{}", if x > 0.0 { "inf" } else { "-inf" })?;
    } else {
        write!(out, "{x:.6}")?;
    }
    Ok(())
}
