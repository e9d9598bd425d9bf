//! 流程层（Workflow Layer）
//!
//! 定义"一个学号"的完整抓取流程。
//!
//! - `fetch_ctx` - 上下文封装（学号 + 目标地址 + 科目过滤）
//! - `fetch_flow` - 流程编排（Token → 验证码 → 提交 → 解析），带重试

pub mod fetch_ctx;
pub mod fetch_flow;

pub use fetch_ctx::FetchCtx;
pub use fetch_flow::FetchFlow;
