//! 批量抓取处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量学号的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：检查 Tesseract、创建 OCR 引擎和抓取流程
//! 2. **批量加载**：从文件读入待查询的学号列表
//! 3. **并发控制**：使用 Semaphore 限制同时在飞的抓取数量
//! 4. **结果划分**：按输入顺序把结局划分为成功 / 失败两个列表
//! 5. **全局统计**：汇总整批的处理结果并落盘
//!
//! ## 划分不变量
//!
//! `successes.len() + failures.len() == 输入学号数`，每个学号恰好出现一次。
//! 任务 panic、超时、重试耗尽都只影响它自己的那一格，绝不中止整批。

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{OcrEngine, TesseractOcr};
use crate::models::{BatchOutcome, ResultRecord};
use crate::workflow::{FetchCtx, FetchFlow};

/// 批量抓取编排器
pub struct BatchOrchestrator {
    flow: Arc<FetchFlow>,
    max_concurrent_fetches: usize,
}

impl BatchOrchestrator {
    /// 创建新的编排器
    pub fn new(config: &Config, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            flow: Arc::new(FetchFlow::new(config, engine)),
            max_concurrent_fetches: config.max_concurrent_fetches,
        }
    }

    /// 批量抓取一组学号的成绩
    ///
    /// 同步语义：所有学号都到达终态（成功或重试耗尽）后才返回。
    /// 唯一会报错的情况是输入本身不合法（空列表）。
    pub async fn run_batch(
        &self,
        usns: &[String],
        index_url: &str,
        result_url: &str,
        subject_filter: Option<&str>,
    ) -> Result<BatchOutcome> {
        if usns.is_empty() {
            anyhow::bail!("学号列表不能为空");
        }

        let flow = Arc::clone(&self.flow);
        let index_url = index_url.to_string();
        let result_url = result_url.to_string();
        let subject_filter = subject_filter.map(|s| s.to_string());

        let outcome = run_batch_with(usns, self.max_concurrent_fetches, move |usn, task_index| {
            let flow = Arc::clone(&flow);
            let ctx = FetchCtx::new(
                usn,
                task_index,
                index_url.clone(),
                result_url.clone(),
                subject_filter.clone(),
            );
            async move { flow.fetch(&ctx).await }
        })
        .await;

        Ok(outcome)
    }
}

/// 用固定宽度的工作池跑一批抓取任务，按输入顺序划分结局
///
/// 抓取逻辑通过闭包注入，批处理本身只认 `Option<ResultRecord>`。
pub(crate) async fn run_batch_with<F, Fut>(
    usns: &[String],
    pool_width: usize,
    fetch_fn: F,
) -> BatchOutcome
where
    F: Fn(String, usize) -> Fut,
    Fut: std::future::Future<Output = Option<ResultRecord>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(pool_width));
    let mut handles = Vec::with_capacity(usns.len());

    for (idx, usn) in usns.iter().enumerate() {
        let task_index = idx + 1;
        let semaphore = Arc::clone(&semaphore);
        // future 先建好但不动，拿到许可才开始真正抓取
        let fetch = fetch_fn(usn.clone(), task_index);

        handles.push(tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return None,
            };
            fetch.await
        }));
    }

    // join_all 保持 spawn 顺序，结局可以直接按位归属到学号
    let joined = future::join_all(handles).await;

    let mut outcome = BatchOutcome::default();
    for ((idx, usn), result) in usns.iter().enumerate().zip(joined) {
        match result {
            Ok(Some(record)) => outcome.successes.push(record),
            Ok(None) => outcome.failures.push(usn.clone()),
            Err(e) => {
                error!("[任务 {}] 任务执行失败: {}", idx + 1, e);
                outcome.failures.push(usn.clone());
            }
        }
    }
    outcome
}

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: BatchOrchestrator,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        if !TesseractOcr::probe() {
            warn!("⚠️ 未检测到 tesseract 可执行文件，验证码识别将全部失败");
        }

        log_startup(&config);

        let engine: Arc<dyn OcrEngine> = Arc::new(TesseractOcr::new(config.ocr_lang.clone()));
        let orchestrator = BatchOrchestrator::new(&config, engine);

        Ok(Self {
            config,
            orchestrator,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let usns = self.load_usns()?;

        if usns.is_empty() {
            warn!("⚠️ 学号列表为空，程序结束");
            return Ok(());
        }

        log_batch_loaded(usns.len(), self.config.max_concurrent_fetches);

        let started_at = chrono::Local::now();
        let outcome = self
            .orchestrator
            .run_batch(
                &usns,
                &self.config.index_url,
                &self.config.result_url,
                self.config.subject_code.as_deref(),
            )
            .await?;

        let output_file = self.write_results(&outcome)?;
        print_final_stats(&outcome, started_at, &output_file);

        Ok(())
    }

    /// 从文件读入学号列表（每行一个，空行跳过）
    fn load_usns(&self) -> Result<Vec<String>> {
        info!("📁 正在读取学号列表: {}", self.config.usn_file);
        let content = std::fs::read_to_string(&self.config.usn_file)
            .with_context(|| format!("无法读取学号文件: {}", self.config.usn_file))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// 把成功抓到的成绩写成 JSON 文件
    fn write_results(&self, outcome: &BatchOutcome) -> Result<String> {
        let output_file = format!("VTU_Results_{}.json", chrono::Local::now().timestamp());
        let json = serde_json::to_string_pretty(&outcome.successes)?;
        std::fs::write(&output_file, json)
            .with_context(|| format!("无法写入结果文件: {}", output_file))?;
        Ok(output_file)
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量成绩抓取模式");
    info!("📊 最大并发数: {}", config.max_concurrent_fetches);
    info!("🔁 单学号重试上限: {}", config.max_retry_attempts);
    if let Some(code) = &config.subject_code {
        info!("🎯 科目过滤: {}", code);
    }
    info!("{}", "=".repeat(60));
}

fn log_batch_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 读入 {} 个待查询的学号", total);
    info!("📋 将以 {} 路并发抓取\n", max_concurrent);
}

fn print_final_stats(outcome: &BatchOutcome, started_at: chrono::DateTime<chrono::Local>, output_file: &str) {
    let elapsed = chrono::Local::now() - started_at;
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!("耗时: {} 秒", elapsed.num_seconds());
    info!("{}", "=".repeat(60));
    info!(
        "✅ 成功: {}/{}",
        outcome.successes.len(),
        outcome.successes.len() + outcome.failures.len()
    );
    info!("❌ 失败: {}", outcome.failures.len());
    for usn in &outcome.failures {
        info!("   - {}", usn);
    }
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_file);
}
