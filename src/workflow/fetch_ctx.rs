//! 抓取上下文
//!
//! 封装"我正在为哪个学号查成绩"这一信息

use std::fmt::Display;

/// 单个学号的抓取上下文
///
/// 包含一次完整抓取所需的全部输入；流程本身不持有任何状态。
#[derive(Debug, Clone)]
pub struct FetchCtx {
    /// 学号（USN）
    pub usn: String,

    /// 任务索引（仅用于日志显示，从 1 开始）
    pub task_index: usize,

    /// 查询首页 URL
    pub index_url: String,

    /// 成绩提交 URL
    pub result_url: String,

    /// 可选的科目代码过滤
    pub subject_filter: Option<String>,
}

impl FetchCtx {
    /// 创建新的抓取上下文
    pub fn new(
        usn: String,
        task_index: usize,
        index_url: String,
        result_url: String,
        subject_filter: Option<String>,
    ) -> Self {
        Self {
            usn,
            task_index,
            index_url,
            result_url,
            subject_filter,
        }
    }
}

impl Display for FetchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[任务 {} USN {}]", self.task_index, self.usn)
    }
}
