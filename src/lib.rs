pub mod error;
pub mod models;
pub mod params;
pub mod scan;
pub mod session;
pub mod store;

pub use error::ScanError;
pub use models::{BoundingBox, DecodedSymbol, ScanOutcome};
pub use params::{FallbackStage, Mode, ScanOptions, ScanParams};
pub use scan::ScanPipeline;
pub use scan::decoder::{QrDecoder, SymbolDecoder};
pub use session::ScanSession;
