//! Decoding and downscaling of the PNG payload returned by the backend.

use crate::error::OpError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use image::{imageops::FilterType, ImageFormat, RgbaImage};
use std::fmt;
use std::sync::Arc;

/// A decoded logo ready for display and saving.
#[derive(Clone)]
pub struct RenderedLogo {
    /// Raw PNG bytes as sent by the backend.
    pub png: Bytes,
    pub width: u32,
    pub height: u32,
    pixels: Arc<RgbaImage>,
}

impl RenderedLogo {
    /// Decode a base64 PNG payload. Anything that is not valid base64 PNG is a malformed response.
    pub fn from_base64(payload: &str) -> Result<Self, OpError> {
        let png = STANDARD
            .decode(payload.trim())
            .map_err(|e| OpError::Malformed(format!("image is not valid base64: {e}")))?;
        Self::from_png(Bytes::from(png))
    }

    pub fn from_png(png: Bytes) -> Result<Self, OpError> {
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .map_err(|e| OpError::Malformed(format!("image is not a PNG: {e}")))?;
        let pixels = decoded.to_rgba8();
        Ok(Self {
            png,
            width: pixels.width(),
            height: pixels.height(),
            pixels: Arc::new(pixels),
        })
    }

    /// `data:` URI for the image, the form a browser `<img src>` would take.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    /// Downscale to fit `cols` x `rows` terminal cells, two pixel rows per cell.
    pub fn thumbnail(&self, cols: u16, rows: u16) -> Thumbnail {
        let max_w = u32::from(cols).max(1);
        let max_h = (u32::from(rows) * 2).max(2);
        let scale = (max_w as f32 / self.width.max(1) as f32)
            .min(max_h as f32 / self.height.max(1) as f32)
            .min(1.0);
        let w = ((self.width as f32 * scale) as u32).max(1);
        // Even pixel height so every cell has a top and bottom half.
        let h = (((self.height as f32 * scale) as u32).max(2) + 1) & !1;
        let resized = image::imageops::resize(self.pixels.as_ref(), w, h, FilterType::Triangle);

        let mut cells = Vec::with_capacity((w * h / 2) as usize);
        for y in (0..h).step_by(2) {
            for x in 0..w {
                let top = flatten_on_white(resized.get_pixel(x, y).0);
                let bottom = flatten_on_white(resized.get_pixel(x, y + 1).0);
                cells.push((top, bottom));
            }
        }
        Thumbnail {
            cols: w as u16,
            rows: (h / 2) as u16,
            cells,
        }
    }
}

impl fmt::Debug for RenderedLogo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedLogo")
            .field("png_bytes", &self.png.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Half-block thumbnail: each cell carries the colors of its upper and lower pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub cols: u16,
    pub rows: u16,
    pub cells: Vec<([u8; 3], [u8; 3])>,
}

impl Thumbnail {
    pub fn cell(&self, col: u16, row: u16) -> Option<([u8; 3], [u8; 3])> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells
            .get(usize::from(row) * usize::from(self.cols) + usize::from(col))
            .copied()
    }
}

fn flatten_on_white([r, g, b, a]: [u8; 4]) -> [u8; 3] {
    let blend = |c: u8| ((u32::from(c) * u32::from(a) + 255 * (255 - u32::from(a))) / 255) as u8;
    [blend(r), blend(g), blend(b)]
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_png() {
        let b64 = STANDARD.encode(sample_png(8, 4));
        let logo = RenderedLogo::from_base64(&b64).unwrap();
        assert_eq!((logo.width, logo.height), (8, 4));
        assert_eq!(logo.data_uri(), format!("data:image/png;base64,{b64}"));
    }

    #[test]
    fn rejects_bad_base64_and_non_png() {
        assert!(matches!(
            RenderedLogo::from_base64("not base64!!"),
            Err(OpError::Malformed(_))
        ));
        let b64 = STANDARD.encode(b"GIF89a definitely not a png");
        assert!(matches!(
            RenderedLogo::from_base64(&b64),
            Err(OpError::Malformed(_))
        ));
    }

    #[test]
    fn thumbnail_fits_the_panel() {
        let logo = RenderedLogo::from_png(Bytes::from(sample_png(64, 64))).unwrap();
        let thumb = logo.thumbnail(20, 8);
        assert!(thumb.cols <= 20);
        assert!(thumb.rows <= 8);
        assert_eq!(thumb.cells.len(), thumb.cols as usize * thumb.rows as usize);
        let (top, _) = thumb.cell(0, 0).unwrap();
        assert!(top[0] > 200 && top[2] < 60);
        assert!(thumb.cell(thumb.cols, 0).is_none());
    }

    #[test]
    fn transparent_pixels_render_white() {
        assert_eq!(flatten_on_white([0, 0, 0, 0]), [255, 255, 255]);
        assert_eq!(flatten_on_white([10, 20, 30, 255]), [10, 20, 30]);
    }
}
