//! 批量文本提取 - 编排层
//!
//! ## 职责
//!
//! 1. **命名**：为缺失文件名的上传生成 `unknown_<uuid>`，重名文件加序号
//! 2. **并发控制**：同一批次最多同时处理 `max_concurrent_files` 个文件
//! 3. **失败隔离**：单个文件失败只记录在结果里，不影响其他文件
//! 4. **资源管理**：一批独占一个临时目录，批次结束时整体删除

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::ExtractionErrorKind;
use crate::infrastructure::{OcrEngine, ScratchSpace};
use crate::models::{BatchExtraction, DocumentFormat, ExtractionResult, UploadedFile};
use crate::services::text_normalizer;
use crate::services::DocumentExtractor;

/// 批量文本提取协调器
pub struct BatchExtractionCoordinator {
    extractor: DocumentExtractor,
    scratch_root: Option<PathBuf>,
    max_concurrent_files: usize,
}

impl BatchExtractionCoordinator {
    pub fn new(config: &Config, ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            extractor: DocumentExtractor::new(config, ocr),
            scratch_root: config.scratch_root.clone(),
            max_concurrent_files: config.max_concurrent_files.max(1),
        }
    }

    /// 提取一批文件，返回 文件名 → 结果
    ///
    /// 每个输入文件都有且只有一个结果；返回前本批的临时文件已全部删除
    pub async fn extract_all(&self, files: Vec<UploadedFile>) -> BatchExtraction {
        let named = assign_names(files);
        info!("开始提取 {} 个文件", named.len());

        let scratch = match ScratchSpace::create(self.scratch_root.as_deref()) {
            Ok(scratch) => scratch,
            Err(e) => {
                error!("无法创建临时目录: {}", e);
                let kind = ExtractionErrorKind::Io(e.to_string());
                let results = named
                    .into_iter()
                    .map(|(name, _)| {
                        let result = failure(&name, &kind);
                        (name, result)
                    })
                    .collect();
                return BatchExtraction { results };
            }
        };

        let results: BTreeMap<String, ExtractionResult> = stream::iter(named)
            .map(|(name, file)| {
                let scratch = &scratch;
                async move {
                    let result = self.extract_one(&name, &file.bytes, scratch).await;
                    (name, result)
                }
            })
            .buffer_unordered(self.max_concurrent_files)
            .collect()
            .await;

        scratch.close();

        let batch = BatchExtraction { results };
        info!("{}", batch.message());
        batch
    }

    async fn extract_one(&self, name: &str, bytes: &[u8], scratch: &ScratchSpace) -> ExtractionResult {
        let detected = DocumentFormat::from_file_name(name).detected();
        match self.extractor.extract(name, bytes, scratch).await {
            Ok(raw) => {
                ExtractionResult::success(name.to_string(), detected, text_normalizer::normalize(&raw))
            }
            Err(e) => {
                warn!("❌ {}", e);
                failure(name, &e.kind)
            }
        }
    }
}

fn failure(name: &str, kind: &ExtractionErrorKind) -> ExtractionResult {
    ExtractionResult::failure(
        name.to_string(),
        DocumentFormat::from_file_name(name).detected(),
        format!("Error processing file: {}", kind),
    )
}

/// 确定每个文件在结果中的名称，保证互不相同
fn assign_names(files: Vec<UploadedFile>) -> Vec<(String, UploadedFile)> {
    let mut used: HashSet<String> = HashSet::new();
    files
        .into_iter()
        .map(|file| {
            let base = file
                .file_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("unknown_{}", uuid::Uuid::new_v4()));

            let mut name = base.clone();
            let mut n = 2;
            while used.contains(&name) {
                name = format!("{} ({})", base, n);
                n += 1;
            }
            used.insert(name.clone());
            (name, file)
        })
        .collect()
}
