//! 验证码求解
//!
//! 预处理 → OCR → 清洗 → 严格长度校验。
//!
//! 只接受清洗后恰好 6 位的识别结果：错误的 6 位猜测重试代价很低，
//! 而放行残缺结果会白白浪费一次提交机会、还可能触发远端限流，
//! 所以这里宁可漏报也不误报。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::captcha::preprocessor::CaptchaPreprocessor;
use crate::infrastructure::OcrEngine;

/// 验证码固定长度
pub const CAPTCHA_LEN: usize = 6;

/// 验证码求解器
#[derive(Clone)]
pub struct CaptchaSolver {
    preprocessor: CaptchaPreprocessor,
    engine: Arc<dyn OcrEngine>,
}

impl CaptchaSolver {
    pub fn new(preprocessor: CaptchaPreprocessor, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            preprocessor,
            engine,
        }
    }

    /// 求解一张验证码图片
    ///
    /// 预处理失败、OCR 失败、清洗后长度不是 6，统统返回 None，
    /// 由上层换一张新验证码重试。
    pub async fn solve(&self, image_bytes: &[u8]) -> Option<String> {
        let mask = self.preprocessor.preprocess(image_bytes)?;

        // OCR 是阻塞的外部调用，放到阻塞线程池里跑
        let engine = Arc::clone(&self.engine);
        let raw = match tokio::task::spawn_blocking(move || engine.recognize(&mask)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                debug!("OCR 识别失败: {}", e);
                return None;
            }
            Err(e) => {
                warn!("OCR 任务执行失败: {}", e);
                return None;
            }
        };

        let code: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();
        if code.chars().count() == CAPTCHA_LEN {
            debug!("验证码识别结果: {}", code);
            Some(code)
        } else {
            debug!("识别结果长度不是 {} 位，丢弃: {:?}", CAPTCHA_LEN, code);
            None
        }
    }
}
