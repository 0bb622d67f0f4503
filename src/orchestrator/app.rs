//! 命令行应用 - 编排层
//!
//! 管理应用生命周期：创建各协作者 → 批量提取 → 出题 → 输出统计

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::clients::{JsonlQuestionStore, OpenAiClient};
use crate::config::Config;
use crate::infrastructure::TesseractEngine;
use crate::models::{BatchExtraction, GenerationRequest, UploadedFile};
use crate::orchestrator::batch_extractor::BatchExtractionCoordinator;
use crate::orchestrator::generation::GenerationOrchestrator;
use crate::utils::logging::{log_extraction_summary, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    extractor: BatchExtractionCoordinator,
    orchestrator: GenerationOrchestrator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let store = JsonlQuestionStore::open(&config.exams_file, &config.questions_output_file)
            .await
            .context("加载考试清单失败")?;

        let extractor =
            BatchExtractionCoordinator::new(&config, Arc::new(TesseractEngine::new(&config)));
        let orchestrator = GenerationOrchestrator::new(
            &config,
            Arc::new(OpenAiClient::new(&config)),
            Arc::new(store),
        );

        Ok(Self {
            config,
            extractor,
            orchestrator,
        })
    }

    /// 运行应用主逻辑
    ///
    /// 有可用文档内容时按内容出题，否则按配置的科目和主题出题
    pub async fn run(&self, paths: Vec<PathBuf>) -> Result<()> {
        log_startup(&self.config, paths.len());

        let files = load_files(&paths).await;
        let extraction = if files.is_empty() {
            BatchExtraction::default()
        } else {
            let batch = self.extractor.extract_all(files).await;
            log_extraction_summary(&batch, self.config.verbose_logging);
            batch
        };

        let (Some(exam_id), Some(creator_id)) =
            (self.config.exam_id.as_deref(), self.config.creator_id.as_deref())
        else {
            info!("未配置 EXAM_ID 和 CREATOR_ID，只做文本提取");
            return Ok(());
        };
        if self.config.question_count == 0 {
            info!("未配置 QUESTION_COUNT，只做文本提取");
            return Ok(());
        }

        let Some(request) = self.build_request(&extraction) else {
            warn!("⚠️ 没有可用于出题的文档内容，也没有配置 SUBJECT 和 TOPIC，程序结束");
            return Ok(());
        };

        let outcome = self
            .orchestrator
            .generate(&request, exam_id, creator_id)
            .await?;

        print_final_stats(&outcome, &self.config.questions_output_file);
        Ok(())
    }

    fn build_request(&self, extraction: &BatchExtraction) -> Option<GenerationRequest> {
        let count = self.config.question_count;
        let difficulty = self.config.difficulty.clone();

        if let Some(text) = extraction.combine_text() {
            info!("📝 使用 {} 个文件的内容出题", extraction.succeeded());
            return Some(GenerationRequest::content(text, difficulty, count));
        }

        match (&self.config.subject, &self.config.topic) {
            (Some(subject), Some(topic)) => {
                info!("📝 按主题出题: {} / {}", subject, topic);
                Some(GenerationRequest::topic(
                    subject.clone(),
                    topic.clone(),
                    self.config.specific_areas.clone(),
                    difficulty,
                    count,
                ))
            }
            _ => None,
        }
    }
}

/// 读取待提取的文件，读取失败的文件跳过
async fn load_files(paths: &[PathBuf]) -> Vec<UploadedFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match UploadedFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => error!("❌ 无法读取文件 {}: {}", path.display(), e),
        }
    }
    files
}
