//! Image loading for diagnosis inputs
//!
//! Decodes the input photograph with the `image` crate and repacks it into
//! the interleaved BGR buffer the rest of the pipeline reads. JPEG and PNG
//! are the expected inputs; the other formats the decoder handles natively
//! are accepted as well.

use std::path::Path;

use crate::error::{DiagnosisError, Result};
use crate::types::BgrImage;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

/// Load an image from disk as an interleaved BGR buffer
///
/// # Arguments
///
/// * `path` - Path to the image file
///
/// # Errors
///
/// Returns [`DiagnosisError::ImageLoad`] if:
/// - The extension is not a supported format
/// - The file cannot be opened
/// - Decoding fails
pub fn load_image(path: &Path) -> Result<BgrImage> {
    use image::ImageReader;

    if ImageFormat::from_extension(path).is_none() {
        return Err(DiagnosisError::ImageLoad {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        DiagnosisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let img = reader.decode().map_err(|e| {
        DiagnosisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(rgb_to_bgr_image(&rgb.into_raw(), width, height))
}

/// Repack an interleaved RGB buffer into BGR channel order
fn rgb_to_bgr_image(rgb_data: &[u8], width: u32, height: u32) -> BgrImage {
    let mut data = Vec::with_capacity(rgb_data.len());
    for px in rgb_data.chunks_exact(3) {
        data.push(px[2]);
        data.push(px[1]);
        data.push(px[0]);
    }
    BgrImage::from_raw(data, width, height)
}
