// THEORY:
// A `Frame` is the read-only input of one cycle: a fixed-size grid of RGB samples handed
// over by whatever captures video. It is a thin wrapper around `image::RgbImage` so the
// rest of the pipeline can lean on the `image`/`imageproc` ecosystem, while the
// constructors accept the raw RGB and RGBA byte buffers capture backends usually produce.
//
// A zero-sized frame is legal. It stands for "the capture collaborator had nothing this
// cycle" and the pipeline skips the cycle when it sees one.

use crate::core_modules::pixel::pixel::Pixel;
use crate::error::{Result, VisionError};
use image::{DynamicImage, RgbImage};

#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Builds a frame from a tightly packed RGB buffer.
    pub fn from_rgb(width: u32, height: u32, buffer: Vec<u8>) -> Result<Self> {
        let actual = buffer.len();
        check_len(width, height, 3, actual)?;
        let image = RgbImage::from_raw(width, height, buffer).ok_or(VisionError::InvalidFrame {
            width,
            height,
            channels: 3,
            expected: expected_len(width, height, 3),
            actual,
        })?;
        Ok(Self { image })
    }

    /// Builds a frame from a tightly packed RGBA buffer. Alpha is dropped.
    pub fn from_rgba(width: u32, height: u32, buffer: &[u8]) -> Result<Self> {
        check_len(width, height, 4, buffer.len())?;
        let rgb: Vec<u8> = buffer
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::from_rgb(width, height, rgb)
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: image.into_rgb8(),
        }
    }

    /// A frame with no samples, used to signal an empty capture.
    pub fn empty() -> Self {
        Self {
            image: RgbImage::new(0, 0),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        let [red, green, blue] = self.image.get_pixel(x, y).0;
        Pixel::new(red, green, blue)
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }
}

impl From<RgbImage> for Frame {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

fn expected_len(width: u32, height: u32, channels: u32) -> usize {
    width as usize * height as usize * channels as usize
}

fn check_len(width: u32, height: u32, channels: u32, actual: usize) -> Result<()> {
    let expected = expected_len(width, height, channels);
    if actual != expected {
        return Err(VisionError::InvalidFrame {
            width,
            height,
            channels,
            expected,
            actual,
        });
    }
    Ok(())
}
