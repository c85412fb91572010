//! Tests for `arna_rt` core functions (numerics, arguments, timing, memory).

use std::ffi::CString;

use pretty_assertions::assert_eq;

use super::*;

// ── Numeric conversions ─────────────────────────────────────────────────

#[test]
fn to_int_truncates_toward_zero() {
    assert_eq!(arna_to_int(3.9), 3);
    assert_eq!(arna_to_int(-3.9), -3);
    assert_eq!(arna_to_int(0.0), 0);
}

#[test]
fn to_int_saturates_non_finite_inputs() {
    assert_eq!(arna_to_int(f64::NAN), 0);
    assert_eq!(arna_to_int(f64::INFINITY), i64::MAX);
    assert_eq!(arna_to_int(f64::NEG_INFINITY), i64::MIN);
}

#[test]
fn to_float_is_exact_for_small_ints() {
    assert_eq!(arna_to_float(0), 0.0);
    assert_eq!(arna_to_float(-7), -7.0);
    assert_eq!(arna_to_float(1 << 52), (1u64 << 52) as f64);
}

#[test]
fn sub_ints_wraps_on_overflow() {
    assert_eq!(arna_sub_ints(5, 3), 2);
    assert_eq!(arna_sub_ints(i64::MIN, 1), i64::MAX);
}

#[test]
fn math_forwards_match_std() {
    assert_eq!(arna_sqrt(9.0), 3.0);
    assert_eq!(arna_log(1.0), 0.0);
    assert_eq!(arna_log(std::f64::consts::E), 1.0);
    assert_eq!(arna_pow(2.0, 10.0), 1024.0);
    assert_eq!(arna_fmod(7.5, 2.0), 1.5);
    assert_eq!(arna_atan2(0.0, 1.0), 0.0);
}

// ── Argument marshaling ─────────────────────────────────────────────────

fn fake_argv(args: &[&str]) -> (Vec<CString>, Vec<*const c_char>) {
    let owned: Vec<CString> = args.iter().map(|s| CString::new(*s).unwrap()).collect();
    let ptrs: Vec<*const c_char> = owned.iter().map(|s| s.as_ptr()).collect();
    (owned, ptrs)
}

#[test]
fn args_skip_the_program_name() {
    let (_owned, ptrs) = fake_argv(&["prog", "17", "-4", "0"]);
    let args = arna_args_from_argv(ptrs.len() as i64, ptrs.as_ptr());
    assert_eq!(args.len, 3);
    // SAFETY: data holds exactly `len` parsed integers.
    let parsed = unsafe { std::slice::from_raw_parts(args.data, args.len as usize) };
    assert_eq!(parsed, &[17, -4, 0]);
}

#[test]
fn args_empty_when_only_program_name() {
    let (_owned, ptrs) = fake_argv(&["prog"]);
    let args = arna_args_from_argv(1, ptrs.as_ptr());
    assert_eq!(args.len, 0);
}

// ── Timing ──────────────────────────────────────────────────────────────

#[test]
fn get_time_is_monotonic() {
    let a = arna_get_time();
    let b = arna_get_time();
    assert!(a >= 0.0);
    assert!(b >= a);
}

// ── Memory ──────────────────────────────────────────────────────────────

#[test]
fn alloc_returns_zeroed_memory() {
    let ptr = arna_alloc(64);
    assert!(!ptr.is_null());
    // SAFETY: arna_alloc returned a live 64-byte allocation.
    let bytes = unsafe { std::slice::from_raw_parts(ptr, 64) };
    assert!(bytes.iter().all(|&b| b == 0));
}
