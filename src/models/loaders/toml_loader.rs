use crate::error::StorageError;
use crate::models::exam::ExamCatalog;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载考试清单
///
/// 文件不存在时返回空清单
pub async fn load_exam_catalog(toml_file_path: &Path) -> Result<ExamCatalog, StorageError> {
    if !fs::try_exists(toml_file_path).await.unwrap_or(false) {
        tracing::warn!("考试清单文件不存在: {}", toml_file_path.display());
        return Ok(ExamCatalog::default());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| StorageError::ReadFailed {
            path: toml_file_path.display().to_string(),
            message: e.to_string(),
        })?;

    let catalog: ExamCatalog = toml::from_str(&content).map_err(|e| StorageError::ParseFailed {
        path: toml_file_path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::info!(
        "成功加载 {} 场考试: {}",
        catalog.exams.len(),
        toml_file_path.display()
    );

    Ok(catalog)
}
