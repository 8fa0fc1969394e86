//! Palette strip rendering
//!
//! Writes the extracted palette as a horizontal strip of color cells for
//! human inspection. The strip is an optional artifact; callers treat a
//! render failure as non-fatal.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{DiagnosisError, Result};

/// Edge length of one palette cell in pixels.
const CELL_SIZE: u32 = 64;

/// Render palette centers (`[b, g, r]` floats) as a strip image.
///
/// # Errors
///
/// Returns [`DiagnosisError::Processing`] when the palette is empty or the
/// file cannot be written.
pub fn render_palette_strip(colors: &[[f32; 3]], path: &Path) -> Result<()> {
    if colors.is_empty() {
        return Err(DiagnosisError::Processing(
            "cannot render an empty palette".to_string(),
        ));
    }

    let mut strip = RgbImage::new(CELL_SIZE * colors.len() as u32, CELL_SIZE);
    for (i, color) in colors.iter().enumerate() {
        let rgb = Rgb([
            color[2].clamp(0.0, 255.0) as u8,
            color[1].clamp(0.0, 255.0) as u8,
            color[0].clamp(0.0, 255.0) as u8,
        ]);
        for y in 0..CELL_SIZE {
            for x in 0..CELL_SIZE {
                strip.put_pixel(i as u32 * CELL_SIZE + x, y, rgb);
            }
        }
    }

    strip.save(path).map_err(|e| {
        DiagnosisError::Processing(format!(
            "failed to write palette strip {}: {e}",
            path.display()
        ))
    })
}
