//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调度和应用生命周期，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<USN>)
//!     ↓
//! workflow::FetchFlow (处理单个 USN，内部重试)
//!     ↓
//! captcha / services (能力层：预处理 / 求解 / 解析)
//!     ↓
//! infrastructure (基础设施：OcrEngine)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量划分，FetchFlow 管单个学号
//! 2. **并发上界**：Semaphore 把同时在飞的抓取数压在池宽之内
//! 3. **划分不变量**：每个输入学号恰好落进成功或失败列表之一，
//!    单个学号怎么失败都不影响整批
//! 4. **无业务逻辑**：只做调度和统计，不碰页面细节

pub mod batch_processor;

pub use batch_processor::{App, BatchOrchestrator};
