//! 数据模型
//!
//! 所有字段均为成绩页上抓取到的原始文本，核心层不做数值解析。

use serde::{Deserialize, Serialize};

/// 单科成绩行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// 科目代码
    pub code: String,
    /// 科目名称
    pub name: String,
    /// 平时分
    pub internals: String,
    /// 考试分
    pub externals: String,
    /// 总分
    pub total: String,
    /// 单科结论（P / F 等）
    pub result: String,
}

/// 单个学号的完整成绩
///
/// 只有至少提取到一行科目成绩时才会存在；空科目列表视为"未查到"。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// 学号（USN）
    pub usn: String,
    /// 学生姓名（缺失时为 "Unknown"）
    pub name: String,
    /// 科目成绩列表（保持页面顺序）
    pub subjects: Vec<SubjectRecord>,
}

/// 批处理结果：输入学号列表的一个划分
///
/// 不变量：`successes.len() + failures.len() == 输入学号数`，
/// 每个学号恰好出现在其中一个列表里，且各自保持输入中的相对顺序。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// 成功抓取的成绩
    pub successes: Vec<ResultRecord>,
    /// 重试耗尽仍失败的学号
    pub failures: Vec<String>,
}
