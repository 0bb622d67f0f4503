/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::{BatchExtraction, GenerationOutcome};

/// 记录程序启动信息
pub fn log_startup(config: &Config, file_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 文档提取与出题模式");
    info!("📄 待处理文件: {}", file_count);
    info!("🤖 模型: {}", config.llm_model_name);
    info!(
        "🔍 OCR: {} (语言: {})",
        if config.ocr_enabled { "启用" } else { "禁用" },
        config.ocr_language
    );
    info!("{}", "=".repeat(60));
}

/// 记录批量提取结果
///
/// # 参数
/// - `batch`: 批量提取结果
/// - `verbose`: 是否输出文本预览
pub fn log_extraction_summary(batch: &BatchExtraction, verbose: bool) {
    info!("\n{}", "─".repeat(60));
    for result in batch.results.values() {
        if result.succeeded {
            let text = result.text.as_deref().unwrap_or_default();
            info!(
                "✓ {} [{}] {} 字符",
                result.source_name,
                result.detected_format,
                text.chars().count()
            );
            if verbose {
                info!("   {}", truncate_text(text, 80));
            }
        } else {
            info!(
                "❌ {} [{}] {}",
                result.source_name,
                result.detected_format,
                result.failure_reason.as_deref().unwrap_or_default()
            );
        }
    }
    info!("{}", batch.message());
    info!("{}", "─".repeat(60));
}

/// 记录生成批次开始
///
/// # 参数
/// - `attempt`: 当前请求次数
/// - `max_attempts`: 最大请求次数
/// - `batch_size`: 本批请求数量
/// - `remaining`: 剩余数量
pub fn log_batch_start(attempt: usize, max_attempts: usize, batch_size: usize, remaining: usize) {
    info!(
        "📦 第 {}/{} 次请求: 本批 {} 道, 剩余 {} 道",
        attempt, max_attempts, batch_size, remaining
    );
}

/// 打印最终统计信息
pub fn print_final_stats(outcome: &GenerationOutcome, output_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 出题完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已保存: {}/{}", outcome.delivered, outcome.requested);
    info!("🔁 请求次数: {}", outcome.attempts_used);
    info!("📌 状态: {:?}", outcome.status);
    info!("{}", outcome.message());
    info!("{}", "=".repeat(60));
    info!("\n题目已保存至: {}", output_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
