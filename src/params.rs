use serde::{Deserialize, Serialize};

/// Illumination context for a scan, chosen once per decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Standard,
    LowLight,
}

/// Fallback stages tried after the adaptive-threshold attempt.
///
/// Their order is deliberately configurable: inversion and edge detection
/// have both been observed to win depending on print stock, so callers can
/// reorder or drop stages via [`ScanOptions::fallback_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStage {
    /// Bitwise inversion of the threshold result, for light-on-dark symbols.
    InvertedThreshold,
    /// Canny edge map of the blurred base image.
    Edges,
    /// Morphological closing of the threshold result, to bridge broken bars.
    Morphology,
}

impl FallbackStage {
    pub fn name(self) -> &'static str {
        match self {
            FallbackStage::InvertedThreshold => "inverted_threshold",
            FallbackStage::Edges => "edges",
            FallbackStage::Morphology => "morphology",
        }
    }
}

/// Per-mode parameter set, resolved once at pipeline entry so no stage
/// carries its own mode conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanParams {
    /// Linear brightness map `p' = clamp(alpha * p + beta)`; low-light only.
    pub brightness_alpha: f32,
    pub brightness_beta: f32,
    /// CLAHE clip limit; low-light only.
    pub clahe_clip_limit: f32,
    /// CLAHE tile grid is `clahe_tiles x clahe_tiles`.
    pub clahe_tiles: u32,
    /// Gaussian blur sigma, equivalent to a 5x5 kernel.
    pub blur_sigma: f32,
    /// Adaptive threshold window size in pixels (odd).
    pub threshold_block: u32,
    /// Adaptive threshold offset subtracted from the local mean.
    pub threshold_c: i16,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Morphological closing structuring-element radius (1 => 3x3, 2 => 5x5).
    pub morph_radius: u8,
    pub morph_iterations: u32,
}

impl ScanParams {
    /// Resolve the fixed parameter table for a mode.
    ///
    /// Low-light values are uniformly more permissive: a wider threshold
    /// window tolerates the local brightness variance of uneven lighting,
    /// relaxed Canny thresholds keep low-contrast edges, and a larger
    /// structuring element bridges bar segments broken by sensor noise.
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Standard => Self {
                brightness_alpha: 1.0,
                brightness_beta: 0.0,
                clahe_clip_limit: 3.0,
                clahe_tiles: 8,
                blur_sigma: 1.1,
                threshold_block: 11,
                threshold_c: 2,
                canny_low: 50.0,
                canny_high: 200.0,
                morph_radius: 1,
                morph_iterations: 1,
            },
            Mode::LowLight => Self {
                brightness_alpha: 1.8,
                brightness_beta: 30.0,
                clahe_clip_limit: 3.0,
                clahe_tiles: 8,
                blur_sigma: 1.1,
                threshold_block: 13,
                threshold_c: 5,
                canny_low: 30.0,
                canny_high: 150.0,
                morph_radius: 2,
                morph_iterations: 2,
            },
        }
    }
}

/// Pipeline-level knobs that are not tied to the illumination mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Run a 3x3 median filter before the Gaussian blur.
    pub denoise: bool,
    /// Stages tried after the adaptive-threshold attempt, in order.
    pub fallback_order: Vec<FallbackStage>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            denoise: true,
            fallback_order: vec![
                FallbackStage::InvertedThreshold,
                FallbackStage::Edges,
                FallbackStage::Morphology,
            ],
        }
    }
}
