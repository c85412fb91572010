//! The filter kernels behind the language's image builtins.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "kernel offsets move between i64 and usize; all values are small and non-negative where converted"
)]

use crate::{Image, ImageError, CHANNELS};

impl Image {
    /// Classic sepia tone: each output channel is a fixed linear blend of
    /// the input RGB, and alpha is forced opaque.
    #[must_use]
    pub fn sepia(&self) -> Image {
        let mut out = Image::new(self.rows, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                let [red, green, blue, _] = self.pixel(r, c);
                out.set_pixel(
                    r,
                    c,
                    [
                        0.393 * red + 0.769 * green + 0.189 * blue,
                        0.349 * red + 0.686 * green + 0.168 * blue,
                        0.272 * red + 0.534 * green + 0.131 * blue,
                        1.0,
                    ],
                );
            }
        }
        out
    }

    /// Gaussian blur with standard deviation `radius`.
    ///
    /// The kernel spans `3 * radius + 0.5` pixels on each side, capped at
    /// the smaller image dimension. Near the edges the kernel is
    /// renormalized over the samples that exist, so borders do not darken.
    /// Alpha is forced opaque.
    pub fn blur(&self, radius: f64) -> Result<Image, ImageError> {
        if radius <= 0.0 {
            return Err(ImageError::NonPositiveBlurRadius);
        }
        let min_dim = self.rows.min(self.cols) as f64;
        let sides = (3.0 * radius + 0.5).min(min_dim) as i64;
        let size = (2 * sides + 1) as usize;

        let denom = 1.0 / (2.0 * std::f64::consts::PI * radius * radius);
        let edenom = -1.0 / (2.0 * radius * radius);
        let mut kernel = vec![0.0; size * size];
        for i in -sides..=sides {
            for j in -sides..=sides {
                let rsq = (i * i + j * j) as f64;
                kernel[((i + sides) * size as i64 + j + sides) as usize] =
                    denom * (rsq * edenom).exp();
            }
        }

        let mut out = Image::new(self.rows, self.cols);
        for i in 0..self.rows as i64 {
            for j in 0..self.cols as i64 {
                let mut acc = [0.0; 3];
                let mut total = 0.0;
                for n in (i - sides).max(0)..=(i + sides).min(self.rows as i64 - 1) {
                    for m in (j - sides).max(0)..=(j + sides).min(self.cols as i64 - 1) {
                        let weight =
                            kernel[((n - i + sides) * size as i64 + (m - j + sides)) as usize];
                        total += weight;
                        let at = self.sample_index(n as usize, m as usize);
                        acc[0] += self.data[at] * weight;
                        acc[1] += self.data[at + 1] * weight;
                        acc[2] += self.data[at + 2] * weight;
                    }
                }
                out.set_pixel(
                    i as usize,
                    j as usize,
                    [acc[0] / total, acc[1] / total, acc[2] / total, 1.0],
                );
            }
        }
        Ok(out)
    }

    /// Bilinear resize to `rows` by `cols`.
    ///
    /// Each output pixel samples the source at the center of its footprint,
    /// blending the four nearest source pixels; coordinates are clamped at
    /// the borders. Alpha is forced opaque. Both the target dimensions and
    /// the source image must be non-empty.
    pub fn resized(&self, rows: usize, cols: usize) -> Result<Image, ImageError> {
        if rows == 0 || cols == 0 {
            return Err(ImageError::NonPositiveResize);
        }
        // A zero-pixel source has nothing to sample from.
        if self.rows == 0 || self.cols == 0 {
            return Err(ImageError::EmptySource);
        }
        let mut out = Image::new(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let src_r = (i as f64 + 0.5) * self.rows as f64 / rows as f64 - 0.5;
                let src_c = (j as f64 + 0.5) * self.cols as f64 / cols as f64 - 0.5;
                let (r0, r1, rf) = split_coord(src_r, self.rows);
                let (c0, c1, cf) = split_coord(src_c, self.cols);

                let mut rgba = [0.0; CHANNELS];
                for (chan, sample) in rgba.iter_mut().enumerate().take(3) {
                    let top = lerp(
                        self.pixel(r0, c0)[chan],
                        self.pixel(r0, c1)[chan],
                        cf,
                    );
                    let bottom = lerp(
                        self.pixel(r1, c0)[chan],
                        self.pixel(r1, c1)[chan],
                        cf,
                    );
                    *sample = lerp(top, bottom, rf);
                }
                rgba[3] = 1.0;
                out.set_pixel(i, j, rgba);
            }
        }
        Ok(out)
    }

    /// Copy the half-open pixel rectangle `[r1, r2) x [c1, c2)`.
    ///
    /// The rectangle must be non-empty and lie entirely inside the image.
    pub fn cropped(
        &self,
        r1: usize,
        c1: usize,
        r2: usize,
        c2: usize,
    ) -> Result<Image, ImageError> {
        if r1 >= r2 || c1 >= c2 || r2 > self.rows || c2 > self.cols {
            return Err(ImageError::CropOutOfBounds);
        }
        let mut out = Image::new(r2 - r1, c2 - c1);
        for i in 0..out.rows {
            for j in 0..out.cols {
                out.set_pixel(i, j, self.pixel(i + r1, j + c1));
            }
        }
        Ok(out)
    }
}

/// Split a fractional source coordinate into clamped floor/ceil indices
/// and the blend weight toward the ceil index.
fn split_coord(x: f64, len: usize) -> (usize, usize, f64) {
    let clamped = x.clamp(0.0, (len - 1) as f64);
    let lo = clamped.floor() as usize;
    let hi = (lo + 1).min(len - 1);
    (lo, hi, clamped - lo as f64)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}
