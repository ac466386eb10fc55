//! Face-region cropping.
//!
//! Detection runs in the vision sidecar; this module only crops the returned
//! boxes out of the original image and encodes them as JPEG.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

const JPEG_QUALITY: u8 = 80;

/// Axis-aligned face bounding box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Crop each detected face out of a base64-encoded image and return the crops
/// as base64 JPEGs, in box order. Boxes are clamped to the image bounds;
/// boxes that clamp to nothing are rejected.
pub fn crop_faces(image_base64: &str, boxes: &[FaceBox]) -> MediaResult<Vec<String>> {
    if boxes.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = BASE64.decode(image_base64)?;
    let img = image::load_from_memory(&bytes).map_err(|e| MediaError::Decode(e.to_string()))?;
    let (img_w, img_h) = (img.width(), img.height());

    let mut crops = Vec::with_capacity(boxes.len());
    for b in boxes {
        let x = b.x.max(0.0) as u32;
        let y = b.y.max(0.0) as u32;
        let w = (b.width as u32).min(img_w.saturating_sub(x));
        let h = (b.height as u32).min(img_h.saturating_sub(y));
        if w == 0 || h == 0 {
            return Err(MediaError::BoxOutOfBounds(format!(
                "box {:?} outside {}x{} image",
                b, img_w, img_h
            )));
        }

        let face = img.crop_imm(x, y, w, h);
        let mut jpeg = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
        face.write_with_encoder(encoder)
            .map_err(|e| MediaError::Encode(e.to_string()))?;
        crops.push(BASE64.encode(jpeg));
    }

    debug!(faces = crops.len(), "Cropped faces");

    Ok(crops)
}
