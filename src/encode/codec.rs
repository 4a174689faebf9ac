use image::ImageEncoder as _;

use crate::{
    foundation::{
        core::{Color, PixelSize, unpremultiply_rgba8_in_place},
        error::{KeepsakeError, KeepsakeResult},
    },
    quality::OutputFormat,
    render::backend::Bitmap,
};

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;
/// JPEG quality used when HEIC was requested.
pub const DEFAULT_HEIC_SUBSTITUTE_QUALITY: u8 = 98;

/// Encoded artifact bytes plus what was asked for and what was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Format the caller asked for.
    pub requested: OutputFormat,
    /// Format actually produced (JPEG when HEIC was requested).
    pub format: OutputFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl EncodedImage {
    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Whether a different format was substituted for the requested one.
    pub fn is_substitute(&self) -> bool {
        self.requested != self.format
    }
}

/// Bitmap to file-format encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoder {
    /// JPEG quality (1..=100).
    pub jpeg_quality: u8,
    /// JPEG quality when substituting for HEIC (1..=100).
    pub heic_substitute_quality: u8,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            heic_substitute_quality: DEFAULT_HEIC_SUBSTITUTE_QUALITY,
        }
    }
}

impl Encoder {
    /// Encode `bitmap` as `format`. JPEG output is flattened over `matte`.
    #[tracing::instrument(level = "debug", skip(self, bitmap), fields(size = %bitmap.size()))]
    pub fn encode(
        &self,
        bitmap: &Bitmap,
        format: OutputFormat,
        matte: Color,
    ) -> KeepsakeResult<EncodedImage> {
        let expected = bitmap.width as usize * bitmap.height as usize * 4;
        if bitmap.width == 0 || bitmap.height == 0 || bitmap.data.len() != expected {
            return Err(KeepsakeError::encode(format!(
                "bitmap {} has {} bytes, expected {expected}",
                bitmap.size(),
                bitmap.data.len()
            )));
        }

        let (bytes, produced) = match format {
            OutputFormat::Jpeg => (self.jpeg(bitmap, matte, self.jpeg_quality)?, OutputFormat::Jpeg),
            OutputFormat::Png => (png(bitmap)?, OutputFormat::Png),
            OutputFormat::Heic => {
                tracing::debug!(
                    quality = self.heic_substitute_quality,
                    "heic requested, encoding jpeg"
                );
                (
                    self.jpeg(bitmap, matte, self.heic_substitute_quality)?,
                    OutputFormat::Jpeg,
                )
            }
        };

        Ok(EncodedImage {
            bytes,
            requested: format,
            format: produced,
            width: bitmap.width,
            height: bitmap.height,
        })
    }

    fn jpeg(&self, bitmap: &Bitmap, matte: Color, quality: u8) -> KeepsakeResult<Vec<u8>> {
        let rgb = flatten_premul(&bitmap.data, matte);
        let mut buf = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
            .write_image(
                &rgb,
                bitmap.width,
                bitmap.height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| KeepsakeError::encode(format!("jpeg: {e}")))?;
        Ok(buf)
    }
}

fn png(bitmap: &Bitmap) -> KeepsakeResult<Vec<u8>> {
    let mut rgba = bitmap.data.clone();
    unpremultiply_rgba8_in_place(&mut rgba);
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            &rgba,
            bitmap.width,
            bitmap.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| KeepsakeError::encode(format!("png: {e}")))?;
    Ok(buf)
}

/// Composite premultiplied RGBA over an opaque `matte`, producing RGB8.
fn flatten_premul(rgba8_premul: &[u8], matte: Color) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba8_premul.len() / 4 * 3);
    for px in rgba8_premul.chunks_exact(4) {
        let inv = 255 - u16::from(px[3]);
        for (c, m) in px[..3].iter().zip([matte.r, matte.g, matte.b]) {
            let v = u16::from(*c) + (u16::from(m) * inv + 127) / 255;
            out.push(v.min(255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/codec.rs"]
mod tests;
