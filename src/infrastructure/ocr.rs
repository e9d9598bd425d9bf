//! OCR 引擎封装
//!
//! ## 职责
//!
//! - 定义 `OcrEngine` 能力接口：输入一张二值化图片，输出识别到的原始文本
//! - 提供基于 Tesseract 命令行的默认实现 `TesseractOcr`
//!
//! 识别配置固定为：单行模式（psm 7）、LSTM 引擎（oem 1）、
//! 62 个大小写字母 + 数字的白名单。识别精度不做任何保证，
//! 低质量结果由上层的重试策略消化。

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use image::GrayImage;
use rusty_tesseract::{Args, Image};
use tracing::debug;

/// 验证码字符白名单：26 大写 + 26 小写 + 10 数字
pub const CHAR_WHITELIST: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// OCR 能力接口
///
/// 阻塞调用，调用方负责放到阻塞线程池里执行。
pub trait OcrEngine: Send + Sync {
    /// 识别一张二值化图片，返回原始文本（不做任何清洗）
    fn recognize(&self, mask: &GrayImage) -> Result<String>;
}

/// 基于 Tesseract 命令行的 OCR 引擎
pub struct TesseractOcr {
    lang: String,
}

/// 临时文件序号，保证同进程内并发识别互不覆盖
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

impl TesseractOcr {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    /// 检查 tesseract 可执行文件是否可用
    pub fn probe() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    /// 为本次识别生成独立的临时文件路径
    fn temp_path() -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("vtu_captcha_{}_{}.png", std::process::id(), seq))
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, mask: &GrayImage) -> Result<String> {
        // Tesseract 通过命令行调用，只认文件，不认内存里的像素
        let path = Self::temp_path();
        mask.save(&path)
            .with_context(|| format!("无法写入临时验证码图片: {}", path.display()))?;

        let args = Args {
            lang: self.lang.clone(),
            dpi: Some(150),
            psm: Some(7),
            oem: Some(1),
            config_variables: HashMap::from([(
                "tessedit_char_whitelist".to_string(),
                CHAR_WHITELIST.to_string(),
            )]),
        };

        let recognized = Image::from_path(path.clone())
            .and_then(|image| rusty_tesseract::image_to_string(&image, &args))
            .map_err(|e| anyhow::anyhow!("Tesseract 识别失败: {}", e));

        // 无论成败都清理临时文件
        let _ = std::fs::remove_file(&path);

        let text = recognized?;
        debug!("OCR 原始输出: {:?}", text);
        Ok(text)
    }
}
