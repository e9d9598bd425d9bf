/// 日志工具模块
///
/// 提供日志初始化和格式化的辅助函数
use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器
///
/// 默认 info 级别，可通过 RUST_LOG 环境变量覆盖；
/// 重复调用是安全的（第二次起不生效）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_short_is_untouched() {
        assert_eq!(truncate_text("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_text_long_gets_ellipsis() {
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
    }
}
