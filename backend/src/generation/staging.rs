//! Pictures are normalized to PNG in a scratch file before being embedded. The file
//! lives exactly as long as its [`StagedImage`].

use crate::documents::DocumentError;
use image::imageops::FilterType;
use image::{load_from_memory, DynamicImage, GenericImageView};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use std::path::Path;
use tempfile::NamedTempFile;

/// Pictures wider than this are scaled down: 4 inches at 300 DPI.
const MAX_WIDTH_PX: u32 = 1_200;

pub struct StagedImage {
    file: NamedTempFile,
    pub width: u32,
    pub height: u32,
}

impl StagedImage {
    /// Decodes `bytes` (PNG or JPEG), downsizes oversized pictures and writes an RGBA
    /// PNG to a temporary file.
    pub fn stage(bytes: &[u8]) -> Result<Self, DocumentError> {
        let img = load_from_memory(bytes)?;
        let (orig_w, orig_h) = img.dimensions();
        let resized: DynamicImage = if orig_w <= MAX_WIDTH_PX {
            img
        } else {
            let new_h = (u64::from(orig_h) * u64::from(MAX_WIDTH_PX) / u64::from(orig_w)).max(1);
            img.resize_exact(MAX_WIDTH_PX, new_h as u32, FilterType::Lanczos3)
        };

        let rgba = resized.to_rgba8();
        let (width, height) = rgba.dimensions();

        let file = tempfile::Builder::new()
            .prefix("docfactory-")
            .suffix(".png")
            .tempfile()?;
        {
            let mut encoder = PngEncoder::new(file.as_file(), width, height);
            encoder.set_color(PngColorType::Rgba);
            encoder.set_depth(PngBitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(rgba.as_raw())?;
            writer.finish()?;
        }

        Ok(Self {
            file,
            width,
            height,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn png_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(std::fs::read(self.path())?)
    }
}
