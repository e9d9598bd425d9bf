//! # VTU Result Scraper
//!
//! 一个用于批量抓取 VTU 成绩的 Rust 应用程序：
//! 门户有验证码拦路，验证码质量又差，远端服务还不稳定，
//! 所以核心是"预处理 + OCR + 盲重试 + 有界并发"这一套组合拳。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部能力（Tesseract），只暴露 `OcrEngine` 接口
//!
//! ### ② 业务能力层（Capabilities）
//! - `captcha/` - 验证码预处理与求解（严格 6 位校验）
//! - `services/` - 纯解析能力：首页 Token / 验证码地址、成绩页提取
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个学号"的完整抓取流程
//! - `FetchCtx` - 上下文封装（学号 + 目标地址 + 科目过滤）
//! - `FetchFlow` - 状态机编排（Token → 验证码 → 提交 → 解析），带重试
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量抓取处理器，管理并发和结果划分
//!
//! ## 模块结构

pub mod captcha;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use captcha::{CaptchaPreprocessor, CaptchaSolver};
pub use config::Config;
pub use error::{StepError, StepResult};
pub use infrastructure::{OcrEngine, TesseractOcr};
pub use models::{BatchOutcome, ResultRecord, SubjectRecord};
pub use orchestrator::{App, BatchOrchestrator};
pub use workflow::{FetchCtx, FetchFlow};
