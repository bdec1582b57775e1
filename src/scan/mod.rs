pub mod decoder;
pub mod preprocessing;

use std::path::PathBuf;

use image::{DynamicImage, GrayImage};
use log::{debug, info, warn};

use crate::error::ScanError;
use crate::models::ScanOutcome;
use crate::params::{FallbackStage, Mode, ScanOptions, ScanParams};
use self::decoder::{QrDecoder, SymbolDecoder};

/// The decode cascade: a fixed sequence of increasingly aggressive image
/// transforms, each followed by a decode attempt, returning on first success.
///
/// Every invocation is a pure function of the frame and the mode; the
/// pipeline holds no mutable state, so independent scans can run on as many
/// threads as the caller likes.
pub struct ScanPipeline<D = QrDecoder> {
    decoder: D,
    options: ScanOptions,
    debug_dir: Option<PathBuf>,
}

impl ScanPipeline<QrDecoder> {
    /// Pipeline with the default rqrr-backed QR decoder.
    pub fn new() -> Self {
        Self::with_decoder(QrDecoder::new())
    }
}

impl Default for ScanPipeline<QrDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: SymbolDecoder> ScanPipeline<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            options: ScanOptions::default(),
            debug_dir: None,
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Save every attempted stage image as `NN_stage.png` in `output_dir`.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> anyhow::Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }
        self.debug_dir = Some(output_dir);
        Ok(self)
    }

    /// Run the full cascade over one frame.
    ///
    /// Returns `Ok(NotFound)` when every stage misses; `Err` only when the
    /// frame itself is unusable.
    pub fn scan(&self, frame: &DynamicImage, mode: Mode) -> Result<ScanOutcome, ScanError> {
        let (width, height) = (frame.width(), frame.height());
        if width == 0 || height == 0 {
            return Err(ScanError::InvalidImage(format!(
                "{}x{} frame has no pixels",
                width, height
            )));
        }
        let params = ScanParams::for_mode(mode);
        let mut attempts = 0u32;

        let mut gray = preprocessing::to_grayscale(frame);

        if mode == Mode::LowLight {
            // Lift the overall level first, then equalize locally so dark
            // corners catch up without blowing out already-bright regions.
            gray = preprocessing::rescale_brightness(
                &gray,
                params.brightness_alpha,
                params.brightness_beta,
            );
            gray = preprocessing::clahe(&gray, params.clahe_clip_limit, params.clahe_tiles);
        }

        if self.options.denoise {
            gray = preprocessing::denoise(&gray);
        }

        // The blurred image is the lineage base for every later stage;
        // stages reapply to it rather than chaining, so one bad transform
        // cannot compound into the next.
        let blurred = preprocessing::apply_blur(&gray, params.blur_sigma);
        if let Some(found) = self.attempt("blur", &blurred, &mut attempts) {
            return Ok(found);
        }

        let thresh = preprocessing::adaptive_threshold(
            &blurred,
            params.threshold_block,
            params.threshold_c,
        );
        if let Some(found) = self.attempt("adaptive_threshold", &thresh, &mut attempts) {
            return Ok(found);
        }

        let mut last = thresh.clone();
        for stage in &self.options.fallback_order {
            let img = match stage {
                FallbackStage::InvertedThreshold => preprocessing::invert(&thresh),
                FallbackStage::Edges => {
                    preprocessing::detect_edges(&blurred, params.canny_low, params.canny_high)
                }
                // Morphology operates on the binarized image; closing a
                // grayscale or edge map is not meaningful.
                FallbackStage::Morphology => {
                    preprocessing::morph_close(&thresh, params.morph_radius, params.morph_iterations)
                }
            };
            if let Some(found) = self.attempt(stage.name(), &img, &mut attempts) {
                return Ok(found);
            }
            last = img;
        }

        debug!("cascade exhausted after {} attempts", attempts);
        Ok(ScanOutcome::NotFound {
            diagnostic: last,
            attempts,
        })
    }

    /// One decode attempt. Counts the attempt, dumps the stage image when
    /// debugging, and packages the first symbol on success.
    fn attempt(
        &self,
        stage: &'static str,
        img: &GrayImage,
        attempts: &mut u32,
    ) -> Option<ScanOutcome> {
        *attempts += 1;
        self.save_debug(*attempts, stage, img);
        debug!("decode attempt {} on '{}' image", attempts, stage);

        let mut symbols = self.decoder.decode(img);
        if symbols.is_empty() {
            return None;
        }
        // First symbol in the decoder's native order wins; the cascade
        // stops here, so no cross-stage ranking exists.
        let symbol = symbols.swap_remove(0);
        info!(
            "decoded {} symbol '{}' at stage '{}'",
            symbol.symbology, symbol.payload, stage
        );
        Some(ScanOutcome::Found {
            symbol,
            stage,
            diagnostic: img.clone(),
        })
    }

    fn save_debug(&self, index: u32, stage: &'static str, img: &GrayImage) {
        let Some(dir) = &self.debug_dir else {
            return;
        };
        let path = dir.join(format!("{:02}_{}.png", index, stage));
        if let Err(e) = img.save(&path) {
            warn!("failed to save debug image {}: {}", path.display(), e);
        }
    }
}
