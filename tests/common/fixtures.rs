use std::cell::Cell;
use std::rc::Rc;

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use polyscan::{DecodedSymbol, SymbolDecoder};
use qrcode::QrCode;

/// Renders `payload` as a QR symbol centered on a 400x300 white color frame,
/// the way an evenly lit photograph of a printed sticker would look.
pub fn qr_frame(payload: &str) -> DynamicImage {
    let code = QrCode::new(payload.as_bytes()).expect("payload fits in a QR symbol");
    let symbol: GrayImage = code.render::<Luma<u8>>().min_dimensions(200, 200).build();

    let mut canvas = RgbImage::from_pixel(400, 300, Rgb([255, 255, 255]));
    let (sw, sh) = symbol.dimensions();
    assert!(sw <= 400 && sh <= 300, "symbol larger than the test frame");
    let ox = (400 - sw) / 2;
    let oy = (300 - sh) / 2;
    for (x, y, p) in symbol.enumerate_pixels() {
        let v = p[0];
        canvas.put_pixel(ox + x, oy + y, Rgb([v, v, v]));
    }
    DynamicImage::ImageRgb8(canvas)
}

/// Scales every channel by `factor`, simulating a frame shot in low light.
pub fn darken(frame: &DynamicImage, factor: f32) -> DynamicImage {
    let rgb = frame.to_rgb8();
    let mut out = RgbImage::new(rgb.width(), rgb.height());
    for (x, y, p) in rgb.enumerate_pixels() {
        let scale = |v: u8| (v as f32 * factor).clamp(0.0, 255.0) as u8;
        out.put_pixel(x, y, Rgb([scale(p[0]), scale(p[1]), scale(p[2])]));
    }
    DynamicImage::ImageRgb8(out)
}

/// Swaps dark and light, producing a light-on-dark symbol.
pub fn invert_frame(frame: &DynamicImage) -> DynamicImage {
    let mut rgb = frame.to_rgb8();
    for p in rgb.pixels_mut() {
        *p = Rgb([255 - p[0], 255 - p[1], 255 - p[2]]);
    }
    DynamicImage::ImageRgb8(rgb)
}

/// Uniform mid-gray frame with no symbol in it.
pub fn blank_frame(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([160, 160, 160])))
}

/// Decoder wrapper that counts how many times the pipeline invokes it.
pub struct CountingDecoder<D> {
    inner: D,
    calls: Rc<Cell<u32>>,
}

impl<D> CountingDecoder<D> {
    /// Returns the wrapper and a handle to the call counter.
    pub fn wrap(inner: D) -> (Self, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                inner,
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl<D: SymbolDecoder> SymbolDecoder for CountingDecoder<D> {
    fn decode(&self, img: &GrayImage) -> Vec<DecodedSymbol> {
        self.calls.set(self.calls.get() + 1);
        self.inner.decode(img)
    }
}

/// Decoder that reports a fixed symbol on every image it sees.
pub struct AlwaysDecoder;

impl SymbolDecoder for AlwaysDecoder {
    fn decode(&self, _img: &GrayImage) -> Vec<DecodedSymbol> {
        vec![DecodedSymbol {
            payload: "stub".to_string(),
            symbology: "stub".to_string(),
            region: None,
        }]
    }
}

/// Decoder that never finds anything.
pub struct NeverDecoder;

impl SymbolDecoder for NeverDecoder {
    fn decode(&self, _img: &GrayImage) -> Vec<DecodedSymbol> {
        Vec::new()
    }
}
