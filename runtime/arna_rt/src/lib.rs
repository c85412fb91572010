//! Arna Runtime Library (`libarna_rt`)
//!
//! This crate provides runtime support for AOT-compiled Arna programs.
//! It contains C-ABI functions that are called by generated code.
//!
//! # Build Modes
//!
//! - **rlib**: For Rust consumers (the interpreter and the test suite)
//! - **staticlib**: For AOT linking (`libarna_rt.a`)
//!
//! # Function Categories
//!
//! - **Printing**: `arna_show`, `arna_print`, `arna_print_time`
//! - **Program control**: `arna_fail_assertion`
//! - **Arguments**: `arna_args_from_argv`
//! - **Timing**: `arna_get_time`
//! - **Memory**: `arna_alloc`
//! - **Numerics**: `arna_to_int`, `arna_to_float`, `arna_sub_ints`,
//!   `arna_sqrt` and the other math forwards
//!
//! # Safety
//!
//! All functions use `#[no_mangle]` and `extern "C"` for FFI compatibility.
//! Functions that take raw pointers are called from generated code which
//! guarantees valid pointers. They're not marked `unsafe` because they're
//! extern "C" FFI entry points, not Rust API functions.
//!
//! # Abort Contract
//!
//! Runtime failures print `[abort] <who>: <message>` to stderr and exit
//! with status 127; a failed language-level assertion prints `[abort]
//! <message>` to stdout and exits with status 1. Generated code relies on
//! these exact formats and codes.

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    unsafe_code,
    reason = "C-ABI runtime functions require unsafe for raw pointer operations"
)]
#![allow(
    clippy::not_unsafe_ptr_arg_deref,
    reason = "FFI entry points receive pointers from generated code which guarantees validity"
)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_ptr_alignment,
    reason = "FFI code uses i64 for ABI compatibility — casts are intentional, and raw-layout reads are unaligned"
)]

pub mod show;

use std::ffi::{c_char, CStr};
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use tracing::debug;

/// Print the runtime abort banner to stderr and exit with status 127.
///
/// `context` is the descriptor of the value being shown, when there is one.
fn runtime_abort(who: &str, msg: &str, context: Option<&str>) -> ! {
    match context {
        Some(ctx) => eprintln!("[abort] {who}: {msg} in '{ctx}'"),
        None => eprintln!("[abort] {who}: {msg}"),
    }
    std::process::exit(127)
}

/// Borrow a NUL-terminated string from generated code.
///
/// The compiler only emits UTF-8, so anything else is corrupted memory.
fn c_str<'a>(who: &str, ptr: *const c_char) -> &'a str {
    if ptr.is_null() {
        runtime_abort(who, "string argument is null", None);
    }
    // SAFETY: generated code passes NUL-terminated strings it owns.
    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => s,
        Err(_) => runtime_abort(who, "string argument is not valid UTF-8", None),
    }
}

// ── Printing ─────────────────────────────────────────────────────────────

/// Print the value at `value`, typed by `type_str`, followed by a newline.
///
/// `type_str` is the NUL-terminated type descriptor the compiler emitted
/// for the shown expression; `value` points to the value's embedded form.
/// Aborts (status 127) on a malformed descriptor or an output failure,
/// naming the descriptor in the banner.
#[no_mangle]
pub extern "C" fn arna_show(type_str: *const c_char, value: *const u8) {
    let descriptor = c_str("show", type_str);
    debug!(target: "arna_rt", descriptor, "show");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    // SAFETY: generated code lays the shown value out exactly as the
    // descriptor it emitted dictates.
    let result = unsafe { show::show_raw(descriptor, value, &mut out) }
        .and_then(|()| out.write_all(b"\n").map_err(show::ShowError::from))
        .and_then(|()| out.flush().map_err(show::ShowError::from));
    if let Err(err) = result {
        drop(out);
        runtime_abort("show", &err.to_string(), Some(descriptor));
    }
}

/// Print a string followed by a newline. A write failure aborts.
#[no_mangle]
pub extern "C" fn arna_print(s: *const c_char) {
    let s = c_str("print", s);
    debug!(target: "arna_rt", message = s, "print");
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if writeln!(out, "{s}").is_err() {
        drop(out);
        runtime_abort("print", "Failed to print", None);
    }
}

/// Print an elapsed time in seconds as `[time] <millis>ms`.
#[no_mangle]
pub extern "C" fn arna_print_time(seconds: f64) {
    debug!(target: "arna_rt", seconds, "print_time");
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if writeln!(out, "[time] {:.6}ms", seconds * 1000.0).is_err() {
        drop(out);
        runtime_abort("print_time", "Failed to print", None);
    }
}

// ── Program control ──────────────────────────────────────────────────────

/// Report a failed language-level assertion and exit with status 1.
#[no_mangle]
pub extern "C" fn arna_fail_assertion(s: *const c_char) -> ! {
    let s = c_str("fail_assertion", s);
    debug!(target: "arna_rt", message = s, "fail_assertion");
    println!("[abort] {s}");
    std::process::exit(1)
}

// ── Arguments ────────────────────────────────────────────────────────────

/// Integer command-line arguments: `{ i64 len, *mut i64 data }`.
#[repr(C)]
pub struct ArnaArgs {
    pub len: i64,
    pub data: *mut i64,
}

/// Marshal C `argc`/`argv` into the program's integer argument array.
///
/// `argv[0]` is the program name and is skipped; every remaining argument
/// must parse as a decimal `i64`, and anything else aborts. The returned
/// buffer is leaked: it stays alive for the whole program run, like every
/// other runtime allocation.
#[no_mangle]
pub extern "C" fn arna_args_from_argv(argc: i64, argv: *const *const c_char) -> ArnaArgs {
    let count = argc.max(1) - 1;
    let mut data = Vec::with_capacity(count as usize);
    for i in 1..=count {
        // SAFETY: the C entry point passes its own argc/argv, so indices
        // below argc are valid.
        let arg = c_str("main", unsafe { *argv.offset(i as isize) });
        match arg.parse::<i64>() {
            Ok(n) => data.push(n),
            Err(_) => runtime_abort("main", "Command line argument too large", None),
        }
    }
    debug!(target: "arna_rt", args = ?data, "parsed command line");
    ArnaArgs {
        len: count,
        data: Box::leak(data.into_boxed_slice()).as_mut_ptr(),
    }
}

// ── Timing ───────────────────────────────────────────────────────────────

static TIMER_EPOCH: OnceLock<Instant> = OnceLock::new();

/// Monotonic seconds since the first `arna_get_time` call.
///
/// The first call anchors the epoch and returns `0.0`; differences between
/// calls measure elapsed wall time.
#[no_mangle]
pub extern "C" fn arna_get_time() -> f64 {
    let epoch = TIMER_EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_secs_f64()
}

// ── Memory ───────────────────────────────────────────────────────────────

/// Allocate `size` zeroed bytes for an array body.
///
/// Aborts on a non-positive size or allocation failure; generated code
/// never frees, so the allocation is intentionally leaked.
#[no_mangle]
pub extern "C" fn arna_alloc(size: i64) -> *mut u8 {
    debug!(target: "arna_rt", size, "alloc");
    if size <= 0 {
        runtime_abort("alloc", "Could not allocate 0 or negative amount of memory", None);
    }
    let layout = match std::alloc::Layout::from_size_align(size as usize, 8) {
        Ok(layout) => layout,
        Err(_) => runtime_abort("alloc", "Could not allocate array memory", None),
    };
    // SAFETY: layout has nonzero size and valid alignment.
    let mem = unsafe { std::alloc::alloc_zeroed(layout) };
    if mem.is_null() {
        runtime_abort("alloc", "Could not allocate array memory", None);
    }
    mem
}

// ── Numerics ─────────────────────────────────────────────────────────────

/// Saturating float-to-int conversion: NaN maps to 0, infinities to the
/// corresponding `i64` extreme.
#[no_mangle]
pub extern "C" fn arna_to_int(x: f64) -> i64 {
    if x.is_nan() {
        0
    } else if x == f64::INFINITY {
        i64::MAX
    } else if x == f64::NEG_INFINITY {
        i64::MIN
    } else {
        x as i64
    }
}

#[no_mangle]
pub extern "C" fn arna_to_float(x: i64) -> f64 {
    x as f64
}

/// Wrapping subtraction, matching the language's two's-complement integers.
#[no_mangle]
pub extern "C" fn arna_sub_ints(a: i64, b: i64) -> i64 {
    a.wrapping_sub(b)
}

#[no_mangle]
pub extern "C" fn arna_sub_floats(a: f64, b: f64) -> f64 {
    a - b
}

macro_rules! forward_unary {
    ($($c_name:ident => $method:ident),* $(,)?) => {
        $(
            #[no_mangle]
            pub extern "C" fn $c_name(x: f64) -> f64 {
                x.$method()
            }
        )*
    };
}

forward_unary! {
    arna_sqrt => sqrt,
    arna_exp => exp,
    arna_sin => sin,
    arna_cos => cos,
    arna_tan => tan,
    arna_asin => asin,
    arna_acos => acos,
    arna_atan => atan,
    arna_log => ln,
}

#[no_mangle]
pub extern "C" fn arna_fmod(a: f64, b: f64) -> f64 {
    a % b
}

#[no_mangle]
pub extern "C" fn arna_pow(a: f64, b: f64) -> f64 {
    a.powf(b)
}

#[no_mangle]
pub extern "C" fn arna_atan2(a: f64, b: f64) -> f64 {
    a.atan2(b)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests panic on malformed fixtures")]
mod tests;
