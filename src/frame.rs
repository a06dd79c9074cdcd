use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::error::InputError;

/// Which grayscale plane to feed the detector from a colour buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelSelect {
    /// Rec. 601 luma, as computed by the `image` crate.
    #[default]
    Luma,
    /// A single raw channel by index.
    Channel(u8),
}

/// Borrowed, row-major, interleaved pixel buffer as received from a caller.
#[derive(Debug, Clone, Copy)]
pub struct RawImage<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl<'a> RawImage<'a> {
    pub fn gray(data: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            channels: 1,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.data.is_empty() {
            return Err(InputError::EmptyBuffer);
        }
        if self.width == 0 || self.height == 0 {
            return Err(InputError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !matches!(self.channels, 1 | 3 | 4) {
            return Err(InputError::UnsupportedChannels(self.channels));
        }
        let expected = self.width as usize * self.height as usize * self.channels as usize;
        if self.data.len() != expected {
            return Err(self.mismatch());
        }
        Ok(())
    }

    /// Validate and copy into an owned grayscale image.
    pub fn to_gray(&self, select: ChannelSelect) -> Result<GrayImage, InputError> {
        self.validate()?;
        let (width, height) = (self.width, self.height);

        if let ChannelSelect::Channel(index) = select {
            if index >= self.channels {
                return Err(InputError::ChannelOutOfRange {
                    index,
                    channels: self.channels,
                });
            }
            let plane: Vec<u8> = self
                .data
                .iter()
                .skip(index as usize)
                .step_by(self.channels as usize)
                .copied()
                .collect();
            return GrayImage::from_raw(width, height, plane).ok_or_else(|| self.mismatch());
        }

        let owned = self.data.to_vec();
        let dynamic = match self.channels {
            1 => GrayImage::from_raw(width, height, owned).map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(width, height, owned).map(DynamicImage::ImageRgb8),
            _ => RgbaImage::from_raw(width, height, owned).map(DynamicImage::ImageRgba8),
        };
        dynamic
            .map(DynamicImage::into_luma8)
            .ok_or_else(|| self.mismatch())
    }

    fn mismatch(&self) -> InputError {
        InputError::LengthMismatch {
            width: self.width,
            height: self.height,
            channels: self.channels,
            expected: self.width as usize * self.height as usize * self.channels as usize,
            actual: self.data.len(),
        }
    }
}
