pub mod ocr_engine;
pub mod scratch;

pub use ocr_engine::{OcrEngine, TesseractEngine};
pub use scratch::ScratchSpace;
