//! Tests for the core [`Image`] container.

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn new_image_is_transparent_black() {
    let img = Image::new(2, 3);
    assert_eq!(img.rows(), 2);
    assert_eq!(img.cols(), 3);
    assert_eq!(img.samples().len(), 2 * 3 * CHANNELS);
    assert!(img.samples().iter().all(|&s| s == 0.0));
}

#[test]
fn pixels_round_trip_row_major() {
    let mut img = Image::new(2, 2);
    img.set_pixel(0, 1, [0.1, 0.2, 0.3, 0.4]);
    img.set_pixel(1, 0, [0.5, 0.6, 0.7, 0.8]);

    assert_eq!(img.pixel(0, 1), [0.1, 0.2, 0.3, 0.4]);
    assert_eq!(img.pixel(1, 0), [0.5, 0.6, 0.7, 0.8]);
    assert_eq!(img.pixel(0, 0), [0.0; CHANNELS]);
    // (0, 1) sits right after (0, 0) in the flat buffer.
    assert_eq!(&img.samples()[CHANNELS..2 * CHANNELS], &[0.1, 0.2, 0.3, 0.4]);
}

#[test]
fn has_size_checks_both_dimensions() {
    let img = Image::new(4, 6);
    assert!(img.has_size(4, 6));
    assert!(!img.has_size(6, 4));
    assert!(!img.has_size(4, 5));
}
