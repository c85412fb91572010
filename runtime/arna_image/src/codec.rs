//! Pluggable image file encoding.

use std::path::Path;

use crate::Image;

/// Reads and writes [`Image`]s in some on-disk format.
///
/// The runtime does not pin an image file format; the embedder supplies a
/// codec (typically PNG-backed) and the runtime routes the language's
/// `read image` and `write image` builtins through it. Sample values are
/// exchanged in the nominal `[0.0, 1.0]` range and quantization is the
/// codec's business.
pub trait PixelCodec {
    type Error: std::error::Error;

    fn read(&self, path: &Path) -> Result<Image, Self::Error>;

    fn write(&self, image: &Image, path: &Path) -> Result<(), Self::Error>;
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests panic on malformed fixtures")]
mod tests;
