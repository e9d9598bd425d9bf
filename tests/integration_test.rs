use std::sync::Arc;

use vtu_result_scraper::utils::logging;
use vtu_result_scraper::{BatchOrchestrator, Config, FetchCtx, FetchFlow, TesseractOcr};

#[tokio::test]
#[ignore] // 默认忽略，需要真实门户和本机 tesseract：cargo test -- --ignored
async fn test_fetch_single_result_live() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    assert!(
        TesseractOcr::probe(),
        "本机没有 tesseract，无法跑真实抓取"
    );

    let engine = Arc::new(TesseractOcr::new(config.ocr_lang.clone()));
    let flow = FetchFlow::new(&config, engine);

    // 注意：请换成一个当前学期真实存在的 USN
    let ctx = FetchCtx::new(
        "1XX21CS001".to_string(),
        1,
        config.index_url.clone(),
        config.result_url.clone(),
        None,
    );

    let record = flow.fetch(&ctx).await.expect("真实抓取应返回成绩");
    assert!(!record.subjects.is_empty(), "成绩里应至少有一科");
    println!("学生: {}，共 {} 科", record.name, record.subjects.len());
}

#[tokio::test]
#[ignore]
async fn test_small_batch_live() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    let engine = Arc::new(TesseractOcr::new(config.ocr_lang.clone()));
    let orchestrator = BatchOrchestrator::new(&config, engine);

    let usns = vec!["1XX21CS001".to_string(), "1XX21CS002".to_string()];
    let outcome = orchestrator
        .run_batch(&usns, &config.index_url, &config.result_url, None)
        .await
        .expect("非空输入不应报错");

    // 无论门户状态如何，划分不变量都必须成立
    assert_eq!(outcome.successes.len() + outcome.failures.len(), usns.len());
    println!(
        "成功 {} 个，失败 {} 个",
        outcome.successes.len(),
        outcome.failures.len()
    );
}
