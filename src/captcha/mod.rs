//! 验证码处理（能力层）
//!
//! ## 模块划分
//!
//! - `preprocessor` - 图像预处理：彩色验证码 → 二值化掩码
//! - `solver` - 验证码求解：预处理 + OCR + 严格 6 位校验

pub mod preprocessor;
pub mod solver;

pub use preprocessor::CaptchaPreprocessor;
pub use solver::CaptchaSolver;
