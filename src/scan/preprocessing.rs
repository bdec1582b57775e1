use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::morphology::close;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// 3x3 median filter, for impulse noise the Gaussian blur smears instead of removing
pub fn denoise(img: &GrayImage) -> GrayImage {
    median_filter(img, 1, 1)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Linear brightness/contrast map `p' = clamp(alpha * p + beta, 0, 255)`.
pub fn rescale_brightness(img: &GrayImage, alpha: f32, beta: f32) -> GrayImage {
    let mut out = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let v = (alpha * pixel[0] as f32 + beta).clamp(0.0, 255.0) as u8;
        out.put_pixel(x, y, Luma([v]));
    }
    out
}

/// Bitwise inversion, for symbols printed light-on-dark.
pub fn invert(img: &GrayImage) -> GrayImage {
    let mut out = img.clone();
    image::imageops::invert(&mut out);
    out
}

/// Morphological closing with a square structuring element of the given
/// radius (1 => 3x3, 2 => 5x5), repeated `iterations` times. Bridges broken
/// bar segments in a binarized image; expects 0/255 input.
pub fn morph_close(img: &GrayImage, radius: u8, iterations: u32) -> GrayImage {
    let mut out = img.clone();
    for _ in 0..iterations.max(1) {
        out = close(&out, Norm::LInf, radius);
    }
    out
}

/// Local mean adaptive binarization over an integral image.
///
/// `block_size` is the full window width in pixels (odd); `c` is subtracted
/// from the local mean before comparison, so a larger `c` classifies more
/// pixels as background. Windows are clipped at the image border.
pub fn adaptive_threshold(img: &GrayImage, block_size: u32, c: i16) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }
    let w = width as usize;
    let h = height as usize;
    let radius = (block_size.max(3) / 2) as usize;

    let iw = w + 1;
    let mut integral = vec![0i64; iw * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0i64;
        for x in 0..w {
            row_sum += img.get_pixel(x as u32, y as u32)[0] as i64;
            integral[(y + 1) * iw + (x + 1)] = row_sum + integral[y * iw + (x + 1)];
        }
    }

    let mut out = GrayImage::new(width, height);
    for y in 0..h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(w);
            let area = ((y1 - y0) * (x1 - x0)) as i64;
            let sum = integral[y1 * iw + x1] - integral[y0 * iw + x1]
                - integral[y1 * iw + x0]
                + integral[y0 * iw + x0];
            let threshold = sum / area - c as i64;
            let v = if (img.get_pixel(x as u32, y as u32)[0] as i64) > threshold {
                255
            } else {
                0
            };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out
}

/// Contrast-limited adaptive histogram equalization.
///
/// The image is split into a `tiles x tiles` grid; each tile gets its own
/// equalization mapping with the histogram clipped at
/// `clip_limit * tile_pixels / 256` (excess redistributed uniformly), and
/// pixels are mapped by bilinear interpolation between the four surrounding
/// tile mappings. The clip keeps flat dark regions from being amplified
/// into noise.
pub fn clahe(img: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }
    let tiles = tiles.max(1);
    let tile_w = width.div_ceil(tiles).max(1);
    let tile_h = height.div_ceil(tiles).max(1);
    let tiles_x = width.div_ceil(tile_w);
    let tiles_y = height.div_ceil(tile_h);

    // One 256-entry lookup table per tile.
    let mut luts = vec![[0u8; 256]; (tiles_x * tiles_y) as usize];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[img.get_pixel(x, y)[0] as usize] += 1;
                }
            }
            let count = ((x1 - x0) * (y1 - y0)) as f32;

            // Clip the histogram and hand the excess back to every bin.
            let limit = ((clip_limit * count / 256.0).max(1.0)) as u32;
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > limit {
                    excess += *bin - limit;
                    *bin = limit;
                }
            }
            let bonus = excess / 256;
            let remainder = (excess % 256) as usize;
            for (i, bin) in hist.iter_mut().enumerate() {
                *bin += bonus + u32::from(i < remainder);
            }

            let lut = &mut luts[(ty * tiles_x + tx) as usize];
            let mut cdf = 0u32;
            for (i, &bin) in hist.iter().enumerate() {
                cdf += bin;
                lut[i] = ((cdf as f32 / count) * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let lut_at = |tx: u32, ty: u32| &luts[(ty * tiles_x + tx) as usize];
    let neighbors = |f: f32, limit: u32| -> (u32, u32, f32) {
        if f <= 0.0 || limit == 1 {
            (0, 0, 0.0)
        } else if f >= (limit - 1) as f32 {
            (limit - 1, limit - 1, 0.0)
        } else {
            let t0 = f.floor();
            (t0 as u32, t0 as u32 + 1, f - t0)
        }
    };

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        // Position relative to tile centers, in tile units.
        let fy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let (ty0, ty1, wy) = neighbors(fy, tiles_y);
        for x in 0..width {
            let fx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
            let (tx0, tx1, wx) = neighbors(fx, tiles_x);

            let v = img.get_pixel(x, y)[0] as usize;
            let tl = lut_at(tx0, ty0)[v] as f32;
            let tr = lut_at(tx1, ty0)[v] as f32;
            let bl = lut_at(tx0, ty1)[v] as f32;
            let br = lut_at(tx1, ty1)[v] as f32;

            let top = tl + (tr - tl) * wx;
            let bottom = bl + (br - bl) * wx;
            let mapped = (top + (bottom - top) * wy).round().clamp(0.0, 255.0) as u8;
            out.put_pixel(x, y, Luma([mapped]));
        }
    }
    out
}
