use image::GrayImage;

/// Axis-aligned bounding box in image coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A single decoded symbol returned by a [`crate::scan::decoder::SymbolDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    /// UTF-8 payload text.
    pub payload: String,
    /// Symbology tag (e.g. "qr").
    pub symbology: String,
    /// Where the symbol was found, if the decoder reports it.
    pub region: Option<BoundingBox>,
}

/// Result of one full cascade run over a frame.
///
/// `Found` carries the image the winning stage fed to the decoder;
/// `NotFound` carries the last image tried. Either way the caller gets
/// something it can save and inspect when a scan misbehaves.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Found {
        symbol: DecodedSymbol,
        /// Name of the cascade stage whose image decoded.
        stage: &'static str,
        diagnostic: GrayImage,
    },
    NotFound {
        /// Image produced by the last stage tried.
        diagnostic: GrayImage,
        /// Number of decode attempts made before giving up.
        attempts: u32,
    },
}

impl ScanOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ScanOutcome::Found { .. })
    }

    /// The decoded symbol, if any.
    pub fn symbol(&self) -> Option<&DecodedSymbol> {
        match self {
            ScanOutcome::Found { symbol, .. } => Some(symbol),
            ScanOutcome::NotFound { .. } => None,
        }
    }

    /// Convenience accessor for the decoded payload text.
    pub fn payload(&self) -> Option<&str> {
        self.symbol().map(|s| s.payload.as_str())
    }

    /// The diagnostic image, whichever variant this is.
    pub fn diagnostic(&self) -> &GrayImage {
        match self {
            ScanOutcome::Found { diagnostic, .. } => diagnostic,
            ScanOutcome::NotFound { diagnostic, .. } => diagnostic,
        }
    }
}
