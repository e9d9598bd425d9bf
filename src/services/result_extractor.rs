//! 成绩页解析
//!
//! ## 职责
//!
//! 纯函数、无副作用：输入成绩页标记，输出学生姓名 + 科目成绩列表。
//!
//! 远端标记没有任何稳定的表头标识，所以单元格一律按固定位置取：
//! 代码 / 名称 / 平时分 / 考试分 / 总分 / 结论 取前六格，
//! 不足 7 格的行视为残缺行直接跳过。

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::models::SubjectRecord;

/// 姓名缺失时的占位值
pub const UNKNOWN_NAME: &str = "Unknown";

/// 成绩页提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub student_name: String,
    pub subjects: Vec<SubjectRecord>,
}

fn selector(raw: &'static str) -> Selector {
    Selector::parse(raw).expect("静态选择器必然合法")
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// 解析成绩页
///
/// `subject_filter` 存在时，代码不匹配（大小写不敏感）的科目行被丢弃；
/// 过滤后为空和页面本来就没有科目行，对调用方来说是同一回事。
pub fn extract(html: &str, subject_filter: Option<&str>) -> Extraction {
    let doc = Html::parse_document(html);

    let student_name =
        extract_student_name(&doc).unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let subjects = extract_subjects(&doc, subject_filter);

    debug!("解析到姓名 {:?}，科目 {} 行", student_name, subjects.len());

    Extraction {
        student_name,
        subjects,
    }
}

/// 定位 "Student Name" 标签，取其所在 td 之后第一个非空、非冒号的兄弟 td
fn extract_student_name(doc: &Html) -> Option<String> {
    let b_sel = selector("b");
    let label = doc
        .select(&b_sel)
        .find(|b| b.text().collect::<String>().contains("Student Name"))?;

    // 向上找最近的 td 祖先
    let mut node = label.parent()?;
    let td = loop {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() == "td" {
                break node;
            }
        }
        node = node.parent()?;
    };

    for sibling in td.next_siblings() {
        let Some(el) = ElementRef::wrap(sibling) else {
            continue;
        };
        if el.value().name() != "td" {
            continue;
        }
        let text = text_of(el);
        if !text.is_empty() && text != ":" {
            return Some(text);
        }
    }
    None
}

/// 遍历 divTable 的数据行（跳过表头），提取科目成绩
fn extract_subjects(doc: &Html, filter: Option<&str>) -> Vec<SubjectRecord> {
    let body_sel = selector("div.divTableBody");
    let row_sel = selector("div.divTableRow");
    let cell_sel = selector("div.divTableCell");

    let mut subjects = Vec::new();
    let Some(body) = doc.select(&body_sel).next() else {
        return subjects;
    };

    for row in body.select(&row_sel).skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 7 {
            continue;
        }

        let code = text_of(cells[0]);
        if let Some(target) = filter {
            if !target.eq_ignore_ascii_case(&code) {
                continue;
            }
        }

        subjects.push(SubjectRecord {
            code,
            name: text_of(cells[1]),
            internals: text_of(cells[2]),
            externals: text_of(cells[3]),
            total: text_of(cells[4]),
            result: text_of(cells[5]),
        });
    }
    subjects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> String {
        let inner: String = cells
            .iter()
            .map(|c| format!(r#"<div class="divTableCell">{}</div>"#, c))
            .collect();
        format!(r#"<div class="divTableRow">{}</div>"#, inner)
    }

    fn result_page(rows: &[String]) -> String {
        let header = row(&[
            "Subject Code",
            "Subject Name",
            "Internal",
            "External",
            "Total",
            "Result",
            "Announced",
        ]);
        format!(
            r#"
            <html><body>
            <table>
                <tr>
                    <td><b>Student Name</b></td>
                    <td>:</td>
                    <td>RAHUL KUMAR</td>
                </tr>
            </table>
            <div class="divTable"><div class="divTableBody">{}{}</div></div>
            </body></html>
            "#,
            header,
            rows.concat()
        )
    }

    fn three_subject_page() -> String {
        result_page(&[
            row(&["A101", "Mathematics", "28", "55", "83", "P", "2026-01-10"]),
            row(&["A102", "Physics", "25", "48", "73", "P", "2026-01-10"]),
            row(&["A103", "Chemistry", "22", "30", "52", "F", "2026-01-10"]),
        ])
    }

    #[test]
    fn test_extract_name_skips_colon_cell() {
        let extraction = extract(&three_subject_page(), None);
        assert_eq!(extraction.student_name, "RAHUL KUMAR");
    }

    #[test]
    fn test_extract_all_subjects_in_page_order() {
        let extraction = extract(&three_subject_page(), None);
        let codes: Vec<&str> = extraction.subjects.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["A101", "A102", "A103"]);

        let physics = &extraction.subjects[1];
        assert_eq!(physics.name, "Physics");
        assert_eq!(physics.internals, "25");
        assert_eq!(physics.externals, "48");
        assert_eq!(physics.total, "73");
        assert_eq!(physics.result, "P");
    }

    #[test]
    fn test_subject_filter_is_case_insensitive() {
        let extraction = extract(&three_subject_page(), Some("a102"));
        assert_eq!(extraction.subjects.len(), 1);
        assert_eq!(extraction.subjects[0].code, "A102");
    }

    #[test]
    fn test_subject_filter_matching_nothing_yields_empty() {
        let extraction = extract(&three_subject_page(), Some("Z999"));
        assert!(extraction.subjects.is_empty());
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let page = result_page(&[
            row(&["A101", "Mathematics", "28", "55", "83", "P", "x"]),
            row(&["残缺行", "只有两格"]),
        ]);
        let extraction = extract(&page, None);
        assert_eq!(extraction.subjects.len(), 1);
    }

    #[test]
    fn test_header_only_table_yields_no_subjects() {
        let extraction = extract(&result_page(&[]), None);
        assert!(extraction.subjects.is_empty());
    }

    #[test]
    fn test_missing_name_defaults_to_unknown() {
        let page = format!(
            r#"<html><body><div class="divTable"><div class="divTableBody">{}{}</div></div></body></html>"#,
            row(&["h1", "h2", "h3", "h4", "h5", "h6", "h7"]),
            row(&["A101", "Mathematics", "28", "55", "83", "P", "x"]),
        );
        let extraction = extract(&page, None);
        assert_eq!(extraction.student_name, UNKNOWN_NAME);
        assert_eq!(extraction.subjects.len(), 1);
    }

    #[test]
    fn test_page_without_table_yields_empty() {
        let extraction = extract("<html><body><p>No Result Found</p></body></html>", None);
        assert_eq!(extraction.student_name, UNKNOWN_NAME);
        assert!(extraction.subjects.is_empty());
    }
}
