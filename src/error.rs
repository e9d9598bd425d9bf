//! 错误类型定义
//!
//! 单次抓取尝试中的每一步都返回 `Result<T, StepError>`：
//! 任何一步失败都只意味着"本次尝试作废"，由重试循环统一消化，
//! 绝不向批处理层传播。

use thiserror::Error;

/// 单次尝试中某一步的可重试失败
#[derive(Debug, Error)]
pub enum StepError {
    /// 网络请求失败（含超时）
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 页面缺少预期的元素
    #[error("页面缺少元素: {0}")]
    MissingElement(&'static str),

    /// 验证码 URL 无法解析为绝对地址
    #[error("验证码地址无效: {0}")]
    InvalidCaptchaUrl(String),

    /// 验证码识别失败（预处理失败或识别结果不是 6 位）
    #[error("验证码识别失败")]
    CaptchaUnsolved,

    /// 提交响应中没有成功标记
    #[error("响应缺少成功标记")]
    NoSuccessMarker,

    /// 成绩页解析后没有任何科目行（或被科目过滤后为空）
    #[error("未提取到任何科目成绩")]
    NoSubjects,
}

/// 步骤结果类型别名
pub type StepResult<T> = Result<T, StepError>;
