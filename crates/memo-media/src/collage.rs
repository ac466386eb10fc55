//! Collage compositing.
//!
//! Batches of up to four images are composited into a fixed-width PNG. The
//! layout is row-based: images are paired into rows of two square cells; a
//! trailing unpaired image takes the full row width. Row height is half the
//! collage width, so the output is deterministic for a given batch size.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::imageops::FilterType;
use image::{imageops, DynamicImage, ImageOutputFormat, RgbaImage};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Fixed collage output width in pixels.
pub const COLLAGE_WIDTH: u32 = 800;

/// Composite a batch of decoded images into a single PNG.
pub fn render_collage(images: &[DynamicImage], width: u32) -> MediaResult<Vec<u8>> {
    if images.is_empty() {
        return Err(MediaError::EmptyBatch);
    }

    let row_height = width / 2;
    let cell_width = width / 2;
    let rows = images.chunks(2).collect::<Vec<_>>();
    let height = row_height * rows.len() as u32;

    let mut canvas = RgbaImage::new(width, height);

    for (row_idx, row) in rows.iter().enumerate() {
        let y = row_idx as u32 * row_height;
        if row.len() == 2 {
            let left = row[0].resize_to_fill(cell_width, row_height, FilterType::Triangle);
            let right = row[1].resize_to_fill(cell_width, row_height, FilterType::Triangle);
            imageops::overlay(&mut canvas, &left, 0, y as i64);
            imageops::overlay(&mut canvas, &right, cell_width as i64, y as i64);
        } else {
            let full = row[0].resize_to_fill(width, row_height, FilterType::Triangle);
            imageops::overlay(&mut canvas, &full, 0, y as i64);
        }
    }

    let mut out = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut out, ImageOutputFormat::Png)
        .map_err(|e| MediaError::Encode(e.to_string()))?;

    debug!(images = images.len(), width, height, "Rendered collage");

    Ok(out.into_inner())
}

/// Decode a batch of base64 image buffers, composite them, and return the
/// collage PNG re-encoded as base64.
pub fn render_collage_base64(buffers: &[String], width: u32) -> MediaResult<String> {
    let images = buffers
        .iter()
        .map(|b| {
            let bytes = BASE64.decode(b)?;
            image::load_from_memory(&bytes).map_err(|e| MediaError::Decode(e.to_string()))
        })
        .collect::<MediaResult<Vec<_>>>()?;

    let png = render_collage(&images, width)?;
    Ok(BASE64.encode(png))
}
