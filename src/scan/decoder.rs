use image::GrayImage;
use log::debug;

use crate::models::{BoundingBox, DecodedSymbol};

/// Boundary to the symbol-decoding engine.
///
/// The pipeline treats decoding as an opaque capability: it hands a
/// processed grayscale/binary image to the decoder and gets back every
/// symbol the engine found, in the engine's native order. Implementations
/// must be pure with respect to the image (no retained state between calls),
/// which is what keeps the whole pipeline deterministic.
pub trait SymbolDecoder {
    fn decode(&self, img: &GrayImage) -> Vec<DecodedSymbol>;
}

/// QR decoder backed by `rqrr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder;

impl QrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolDecoder for QrDecoder {
    fn decode(&self, img: &GrayImage) -> Vec<DecodedSymbol> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| img.get_pixel(x as u32, y as u32)[0],
        );

        let mut symbols = Vec::new();
        for grid in prepared.detect_grids() {
            let region = corners_to_box(
                grid.bounds.iter().map(|p| (p.x, p.y)),
                width,
                height,
            );
            match grid.decode() {
                Ok((_meta, content)) => {
                    symbols.push(DecodedSymbol {
                        payload: content,
                        symbology: "qr".to_string(),
                        region,
                    });
                }
                // A located grid that fails error correction is treated the
                // same as no grid at all; the cascade simply moves on.
                Err(e) => debug!("grid located but decode failed: {:?}", e),
            }
        }
        symbols
    }
}

fn corners_to_box(
    corners: impl Iterator<Item = (i32, i32)>,
    width: u32,
    height: u32,
) -> Option<BoundingBox> {
    let mut min_x = i32::MAX;
    let mut max_x = i32::MIN;
    let mut min_y = i32::MAX;
    let mut max_y = i32::MIN;
    for (x, y) in corners {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_x > max_x {
        return None;
    }
    let clamp_x = |v: i32| v.clamp(0, width as i32 - 1) as u32;
    let clamp_y = |v: i32| v.clamp(0, height as i32 - 1) as u32;
    let (min_x, max_x) = (clamp_x(min_x), clamp_x(max_x));
    let (min_y, max_y) = (clamp_y(min_y), clamp_y(max_y));
    Some(BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn empty_image_yields_no_symbols() {
        let img = GrayImage::new(0, 0);
        assert!(QrDecoder::new().decode(&img).is_empty());
    }

    #[test]
    fn blank_image_yields_no_symbols() {
        let img = GrayImage::from_pixel(120, 120, Luma([255]));
        assert!(QrDecoder::new().decode(&img).is_empty());
    }
}
