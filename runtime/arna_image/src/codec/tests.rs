//! Tests for the codec seam, using an in-memory codec.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use thiserror::Error;

use super::PixelCodec;
use crate::Image;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
enum MemoryCodecError {
    #[error("no image stored at {0}")]
    NotFound(PathBuf),
}

/// Stores encoded images in a map keyed by path.
#[derive(Default)]
struct MemoryCodec {
    store: RefCell<HashMap<PathBuf, Image>>,
}

impl PixelCodec for MemoryCodec {
    type Error = MemoryCodecError;

    fn read(&self, path: &Path) -> Result<Image, Self::Error> {
        self.store
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| MemoryCodecError::NotFound(path.to_path_buf()))
    }

    fn write(&self, image: &Image, path: &Path) -> Result<(), Self::Error> {
        self.store
            .borrow_mut()
            .insert(path.to_path_buf(), image.clone());
        Ok(())
    }
}

#[test]
fn write_then_read_returns_the_same_image() {
    let codec = MemoryCodec::default();
    let mut img = Image::new(2, 2);
    img.set_pixel(1, 1, [0.1, 0.2, 0.3, 1.0]);

    codec.write(&img, Path::new("out.img")).unwrap();
    let back = codec.read(Path::new("out.img")).unwrap();
    assert_eq!(back, img);
}

#[test]
fn read_of_missing_path_is_an_error() {
    let codec = MemoryCodec::default();
    let err = codec.read(Path::new("absent.img")).unwrap_err();
    assert_eq!(err, MemoryCodecError::NotFound(PathBuf::from("absent.img")));
}

#[test]
fn filters_compose_through_the_codec() {
    let codec = MemoryCodec::default();
    let img = Image::new(3, 3).sepia();
    codec.write(&img, Path::new("a.img")).unwrap();

    let cropped = codec
        .read(Path::new("a.img"))
        .unwrap()
        .cropped(0, 0, 2, 2)
        .unwrap();
    assert!(cropped.has_size(2, 2));
}
