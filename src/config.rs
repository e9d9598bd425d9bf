/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时抓取的学号数量
    pub max_concurrent_fetches: usize,
    /// 单个学号的最大重试次数
    pub max_retry_attempts: usize,
    /// 成绩查询首页 URL（含 Token 和验证码）
    pub index_url: String,
    /// 成绩提交 URL
    pub result_url: String,
    /// 只保留该科目代码的成绩行（为空则保留全部）
    pub subject_code: Option<String>,
    /// 首页 / 验证码请求超时（秒）
    pub page_timeout_secs: u64,
    /// 成绩提交请求超时（秒）
    pub submit_timeout_secs: u64,
    /// 验证码目标墨色（三通道相同）
    pub captcha_target_color: u8,
    /// 墨色容差
    pub captcha_tolerance: u8,
    /// Tesseract 识别语言
    pub ocr_lang: String,
    /// 学号列表文件（每行一个 USN）
    pub usn_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 15,
            max_retry_attempts: 22,
            index_url: "https://results.vtu.ac.in/D25J26Ecbcs/index.php".to_string(),
            result_url: "https://results.vtu.ac.in/D25J26Ecbcs/resultpage.php".to_string(),
            subject_code: None,
            page_timeout_secs: 10,
            submit_timeout_secs: 15,
            captcha_target_color: 102,
            captcha_tolerance: 25,
            ocr_lang: "eng".to_string(),
            usn_file: "usns.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_fetches: std::env::var("MAX_CONCURRENT_FETCHES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_fetches),
            max_retry_attempts: std::env::var("MAX_RETRY_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_retry_attempts),
            index_url: std::env::var("INDEX_URL").unwrap_or(default.index_url),
            result_url: std::env::var("RESULT_URL").unwrap_or(default.result_url),
            subject_code: std::env::var("SUBJECT_CODE").ok().filter(|v| !v.trim().is_empty()),
            page_timeout_secs: std::env::var("PAGE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.page_timeout_secs),
            submit_timeout_secs: std::env::var("SUBMIT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_timeout_secs),
            captcha_target_color: std::env::var("CAPTCHA_TARGET_COLOR").ok().and_then(|v| v.parse().ok()).unwrap_or(default.captcha_target_color),
            captcha_tolerance: std::env::var("CAPTCHA_TOLERANCE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.captcha_tolerance),
            ocr_lang: std::env::var("OCR_LANG").unwrap_or(default.ocr_lang),
            usn_file: std::env::var("USN_FILE").unwrap_or(default.usn_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
