//! 业务能力层（Services Layer）
//!
//! 纯解析能力，不发请求、不持有任何资源。
//!
//! - `page_parser` - 从查询首页提取 Token 和验证码图片地址
//! - `result_extractor` - 从成绩页提取学生姓名和科目成绩

pub mod page_parser;
pub mod result_extractor;

pub use result_extractor::{extract, Extraction};
