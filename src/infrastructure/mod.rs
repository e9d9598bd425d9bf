//! 基础设施层（Infrastructure Layer）
//!
//! 持有对外部能力（Tesseract OCR）的唯一封装，只暴露"识别一张图"这一能力。

pub mod ocr;

pub use ocr::{OcrEngine, TesseractOcr};
