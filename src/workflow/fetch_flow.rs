//! 抓取流程 - 流程层
//!
//! 核心职责：定义"一个学号"的完整抓取状态机
//!
//! 单次尝试的流程顺序：
//! 1. GET 查询首页 → 提取 Token 和验证码图片地址
//! 2. GET 验证码图片 → OCR 求解（解不出则本次尝试作废）
//! 3. POST 学号 + Token + 验证码 → 响应必须含成功标记
//! 4. 解析成绩页（零科目视为"未查到"，本次尝试作废）
//!
//! 任何一步失败都折叠为 `StepError`，整个状态机从头重试
//! （重新拿 Token、重新拿验证码，旧的不能复用），直到重试上限。
//! 重试上限设得很高（默认 22 次）：低分辨率验证码的 OCR 准确率
//! 本来就不高，门户自身的 Token / 验证码也会间歇性渲染失败，
//! 把失败当瞬态反复重试，比任何更复杂的求解方案都便宜。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Url};
use tracing::{debug, info, warn};

use crate::captcha::{CaptchaPreprocessor, CaptchaSolver};
use crate::config::Config;
use crate::error::{StepError, StepResult};
use crate::infrastructure::OcrEngine;
use crate::models::ResultRecord;
use crate::services::{self, page_parser};
use crate::utils::logging::truncate_text;
use crate::workflow::fetch_ctx::FetchCtx;

/// 成绩页的成功标记：响应里没有它就说明提交没被接受
pub const SUCCESS_MARKER: &str = "Student Name";

/// 伪装成普通浏览器的 User-Agent
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0.0.0 Safari/537.36";

/// 单学号抓取流程
///
/// - 编排完整的抓取状态机，决定何时重试、何时放弃
/// - 每次尝试使用全新的 Cookie 上下文，尝试之间互不串扰
/// - 只依赖业务能力（captcha / services），不被批处理层的其他任务影响
#[derive(Clone)]
pub struct FetchFlow {
    solver: CaptchaSolver,
    max_retry_attempts: usize,
    page_timeout: Duration,
    submit_timeout: Duration,
    verbose_logging: bool,
}

impl FetchFlow {
    /// 创建新的抓取流程
    pub fn new(config: &Config, engine: Arc<dyn OcrEngine>) -> Self {
        let preprocessor =
            CaptchaPreprocessor::new(config.captcha_target_color, config.captcha_tolerance);
        Self {
            solver: CaptchaSolver::new(preprocessor, engine),
            max_retry_attempts: config.max_retry_attempts,
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            submit_timeout: Duration::from_secs(config.submit_timeout_secs),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 抓取一个学号的成绩
    ///
    /// 重试耗尽返回 None；除此之外没有任何错误会冒出去。
    pub async fn fetch(&self, ctx: &FetchCtx) -> Option<ResultRecord> {
        info!("{} 🔍 开始抓取（最多 {} 次尝试）", ctx, self.max_retry_attempts);

        let record = run_with_retry(self.max_retry_attempts, |attempt| {
            self.logged_attempt(ctx, attempt)
        })
        .await;

        match &record {
            Some(r) => info!("{} ✓ 抓取成功，共 {} 科", ctx, r.subjects.len()),
            None => warn!(
                "{} ⚠️ 重试 {} 次后仍未拿到成绩",
                ctx, self.max_retry_attempts
            ),
        }
        record
    }

    /// 执行一次尝试并记录失败原因
    async fn logged_attempt(&self, ctx: &FetchCtx, attempt: usize) -> StepResult<ResultRecord> {
        match self.attempt(ctx).await {
            Ok(record) => Ok(record),
            Err(step) => {
                debug!(
                    "{} 第 {}/{} 次尝试失败: {}",
                    ctx, attempt, self.max_retry_attempts, step
                );
                Err(step)
            }
        }
    }

    /// 单次尝试状态机：Token → 验证码 → 提交 → 解析
    async fn attempt(&self, ctx: &FetchCtx) -> StepResult<ResultRecord> {
        // 每次尝试独立的 Cookie 上下文，三个请求之间保持会话连续
        let client = self.build_client()?;

        // ① 查询首页：拿 Token 和验证码地址
        let index_page = client
            .get(&ctx.index_url)
            .header(header::REFERER, &ctx.index_url)
            .timeout(self.page_timeout)
            .send()
            .await?
            .text()
            .await?;

        let token = page_parser::extract_form_token(&index_page)
            .ok_or(StepError::MissingElement("input[name=Token]"))?;

        let index_url = Url::parse(&ctx.index_url)
            .map_err(|e| StepError::InvalidCaptchaUrl(e.to_string()))?;
        let captcha_url = page_parser::extract_captcha_url(&index_page, &index_url)
            .ok_or(StepError::MissingElement("验证码 img"))?;

        // ② 验证码图片
        let captcha_bytes = client
            .get(captcha_url)
            .header(header::REFERER, &ctx.index_url)
            .timeout(self.page_timeout)
            .send()
            .await?
            .bytes()
            .await?;

        // ③ OCR 求解
        let captcha_code = self
            .solver
            .solve(&captcha_bytes)
            .await
            .ok_or(StepError::CaptchaUnsolved)?;

        // ④ 提交学号 + Token + 验证码
        let response = client
            .post(&ctx.result_url)
            .header(header::REFERER, &ctx.index_url)
            .form(&[
                ("Token", token.as_str()),
                ("lns", ctx.usn.as_str()),
                ("captchacode", captcha_code.as_str()),
            ])
            .timeout(self.submit_timeout)
            .send()
            .await?
            .text()
            .await?;

        if self.verbose_logging {
            debug!("{} 响应预览: {}", ctx, truncate_text(&response, 120));
        }

        if !response.contains(SUCCESS_MARKER) {
            return Err(StepError::NoSuccessMarker);
        }

        // ⑤ 解析成绩页
        let extraction = services::extract(&response, ctx.subject_filter.as_deref());
        if extraction.subjects.is_empty() {
            return Err(StepError::NoSubjects);
        }

        Ok(ResultRecord {
            usn: ctx.usn.clone(),
            name: extraction.student_name,
            subjects: extraction.subjects,
        })
    }

    /// 构建本次尝试专用的 HTTP 客户端
    ///
    /// 门户的证书链常年有问题，跳过 TLS 校验
    fn build_client(&self) -> StepResult<Client> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(client)
    }
}

/// 把一个可失败的尝试重复执行到成功或耗尽
///
/// 尝试编号从 1 开始传给闭包；全部失败返回 None。
pub(crate) async fn run_with_retry<T, F, Fut>(max_attempts: usize, mut attempt_fn: F) -> Option<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = StepResult<T>>,
{
    for attempt in 1..=max_attempts {
        if let Ok(value) = attempt_fn(attempt).await {
            return Some(value);
        }
    }
    None
}
