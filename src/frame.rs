//! Raw video frames.
//!
//! A `Frame` is a packed RGB24 pixel buffer plus dimensions. Frames are
//! produced fresh by a `VideoSource`, consumed by one detect/annotate cycle,
//! and dropped; nothing persists across frames.

use image::RgbImage;

use crate::error::{Error, Result};

/// One decoded video frame, packed RGB24.
#[derive(Clone, Debug)]
pub struct Frame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap a packed RGB24 buffer. The buffer length must be
    /// `width * height * 3`.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| Error::stream("frame dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(Error::stream(format!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Convert into an owned `RgbImage` for annotation.
    pub fn into_image(self) -> RgbImage {
        // Length was validated at construction.
        RgbImage::from_raw(self.width, self.height, self.pixels)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    /// Borrowing conversion; copies the pixel buffer.
    pub fn to_image(&self) -> RgbImage {
        self.clone().into_image()
    }

    pub fn from_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            pixels: image.into_raw(),
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_buffer_length() {
        let err = Frame::new(vec![0u8; 10], 4, 4).unwrap_err();
        assert!(matches!(err, Error::Stream(_)));
    }

    #[test]
    fn round_trips_through_image() {
        let frame = Frame::new(vec![7u8; 4 * 2 * 3], 4, 2).unwrap();
        let image = frame.to_image();
        assert_eq!(image.dimensions(), (4, 2));
        let back = Frame::from_image(image);
        assert_eq!(back.width(), 4);
        assert_eq!(back.height(), 2);
        assert!(back.pixels().iter().all(|&b| b == 7));
    }
}
