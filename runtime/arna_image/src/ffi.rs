//! C-ABI wrappers over the image filters.
//!
//! Generated code passes images by value as `{ i64 rows, i64 cols, *mut
//! f64 data }`. Wrappers copy the samples into an owned [`Image`], run the
//! safe filter, and leak the result back out; filter errors become the
//! assertion-style abort (status 1) generated code expects from builtins.

#![allow(
    unsafe_code,
    reason = "C-ABI wrappers require unsafe for raw sample buffers"
)]
#![allow(
    clippy::not_unsafe_ptr_arg_deref,
    reason = "FFI entry points receive pointers from generated code which guarantees validity"
)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "FFI code uses i64 for ABI compatibility — casts are intentional and safe"
)]

use tracing::debug;

use crate::{Image, ImageError, CHANNELS};

/// Image representation shared with generated code.
#[repr(C)]
pub struct ArnaImage {
    pub rows: i64,
    pub cols: i64,
    pub data: *mut f64,
}

/// Print the builtin abort banner to stdout and exit with status 1.
fn builtin_abort(err: &ImageError) -> ! {
    println!("[abort] {err}");
    std::process::exit(1)
}

/// Copy an incoming image into owned storage.
///
/// Negative dimensions are treated as empty rather than trusted.
fn copy_in(img: &ArnaImage) -> Image {
    let rows = img.rows.max(0) as usize;
    let cols = img.cols.max(0) as usize;
    // SAFETY: generated code passes a buffer of rows * cols * CHANNELS
    // samples.
    let samples = unsafe { std::slice::from_raw_parts(img.data, rows * cols * CHANNELS) };
    Image::from_vec(rows, cols, samples.to_vec())
}

/// Leak an owned image into the caller's representation.
///
/// Like every runtime allocation, the samples live for the rest of the
/// program.
fn leak_out(image: Image) -> ArnaImage {
    let rows = image.rows() as i64;
    let cols = image.cols() as i64;
    let data = Box::leak(image.into_samples().into_boxed_slice()).as_mut_ptr();
    ArnaImage { rows, cols, data }
}

#[no_mangle]
pub extern "C" fn arna_sepia(img: ArnaImage) -> ArnaImage {
    debug!(target: "arna_image", rows = img.rows, cols = img.cols, "sepia");
    leak_out(copy_in(&img).sepia())
}

#[no_mangle]
pub extern "C" fn arna_blur(img: ArnaImage, radius: f64) -> ArnaImage {
    debug!(target: "arna_image", rows = img.rows, cols = img.cols, radius, "blur");
    match copy_in(&img).blur(radius) {
        Ok(out) => leak_out(out),
        Err(err) => builtin_abort(&err),
    }
}

#[no_mangle]
pub extern "C" fn arna_resize(img: ArnaImage, rows: i64, cols: i64) -> ArnaImage {
    debug!(target: "arna_image", rows, cols, "resize");
    if rows <= 0 || cols <= 0 {
        builtin_abort(&ImageError::NonPositiveResize);
    }
    match copy_in(&img).resized(rows as usize, cols as usize) {
        Ok(out) => leak_out(out),
        Err(err) => builtin_abort(&err),
    }
}

#[no_mangle]
pub extern "C" fn arna_crop(img: ArnaImage, r1: i64, c1: i64, r2: i64, c2: i64) -> ArnaImage {
    debug!(target: "arna_image", r1, c1, r2, c2, "crop");
    if r1 < 0 || c1 < 0 {
        builtin_abort(&ImageError::CropOutOfBounds);
    }
    match copy_in(&img).cropped(r1 as usize, c1 as usize, r2.max(0) as usize, c2.max(0) as usize) {
        Ok(out) => leak_out(out),
        Err(err) => builtin_abort(&err),
    }
}

/// Whether the image is exactly `rows` by `cols`. Returns an `i32`
/// boolean for ABI compatibility.
#[no_mangle]
pub extern "C" fn arna_has_size(img: ArnaImage, rows: i64, cols: i64) -> i32 {
    i32::from(img.rows == rows && img.cols == cols)
}
