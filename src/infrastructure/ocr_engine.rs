//! OCR 引擎 - 基础设施层
//!
//! 只暴露"图片 → 文本"和"PDF → 文本"两种能力，不关心调用方的业务

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ExtractionErrorKind;

/// OCR 识别能力
///
/// `work_dir` 由调用方提供并负责清理
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize_image(&self, image: &Path) -> Result<String, ExtractionErrorKind>;

    async fn recognize_pdf(&self, pdf: &Path, work_dir: &Path)
        -> Result<String, ExtractionErrorKind>;
}

/// 调用系统 tesseract / pdftoppm 命令的 OCR 引擎
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    tesseract_path: String,
    pdftoppm_path: String,
    tessdata_path: PathBuf,
    language: String,
    dpi: u32,
}

impl TesseractEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            tesseract_path: config.tesseract_path.clone(),
            pdftoppm_path: config.pdftoppm_path.clone(),
            tessdata_path: PathBuf::from(&config.tessdata_path),
            language: config.ocr_language.clone(),
            dpi: config.ocr_dpi,
        }
    }

    async fn ensure_tessdata(&self) -> Result<(), ExtractionErrorKind> {
        let exists = tokio::fs::try_exists(&self.tessdata_path)
            .await
            .unwrap_or(false);
        if exists {
            Ok(())
        } else {
            Err(ExtractionErrorKind::OcrFailure(format!(
                "语言数据目录不存在: {}",
                self.tessdata_path.display()
            )))
        }
    }

    /// 把 PDF 每页渲染为 PNG，按页码顺序返回
    async fn rasterize(&self, pdf: &Path, work_dir: &Path) -> Result<Vec<PathBuf>, ExtractionErrorKind> {
        let prefix = format!("page-{}", uuid::Uuid::new_v4());
        let output = Command::new(&self.pdftoppm_path)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(work_dir.join(&prefix))
            .output()
            .await
            .map_err(|e| {
                ExtractionErrorKind::OcrFailure(format!(
                    "无法启动 pdftoppm ({}): {}",
                    self.pdftoppm_path, e
                ))
            })?;

        if !output.status.success() {
            return Err(ExtractionErrorKind::OcrFailure(format!(
                "pdftoppm 执行失败: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mut pages = Vec::new();
        let mut entries = tokio::fs::read_dir(work_dir)
            .await
            .map_err(|e| ExtractionErrorKind::Io(e.to_string()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ExtractionErrorKind::Io(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(&prefix) && name.ends_with(".png") {
                pages.push(entry.path());
            }
        }
        // pdftoppm 的页码按总页数补零，字典序即页序
        pages.sort();
        debug!("PDF 渲染完成: {} 页", pages.len());
        Ok(pages)
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize_image(&self, image: &Path) -> Result<String, ExtractionErrorKind> {
        self.ensure_tessdata().await?;

        let output = Command::new(&self.tesseract_path)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--tessdata-dir")
            .arg(&self.tessdata_path)
            .output()
            .await
            .map_err(|e| {
                ExtractionErrorKind::OcrFailure(format!(
                    "无法启动 tesseract ({}): {}",
                    self.tesseract_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("tesseract 执行失败: {}", stderr);
            return Err(ExtractionErrorKind::OcrFailure(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn recognize_pdf(
        &self,
        pdf: &Path,
        work_dir: &Path,
    ) -> Result<String, ExtractionErrorKind> {
        self.ensure_tessdata().await?;

        let pages = self.rasterize(pdf, work_dir).await?;
        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            let text = self.recognize_image(page).await?;
            if !text.is_empty() {
                texts.push(text);
            }
        }
        Ok(texts.join("\n"))
    }
}
