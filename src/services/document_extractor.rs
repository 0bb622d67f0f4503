//! 单文件文本提取
//!
//! 按扩展名分派到各格式的读取逻辑；所有临时文件都写在调用方传入的批次目录中

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ExtractionError, ExtractionErrorKind};
use crate::infrastructure::{OcrEngine, ScratchSpace};
use crate::models::{DocumentFormat, ImageKind, Placeholder};
use crate::services::pdf_reader::{read_pdf, PdfContent};

/// 文档文本提取器
#[derive(Clone)]
pub struct DocumentExtractor {
    ocr: Arc<dyn OcrEngine>,
    ocr_enabled: bool,
}

impl DocumentExtractor {
    pub fn new(config: &Config, ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            ocr,
            ocr_enabled: config.ocr_enabled,
        }
    }

    /// 提取一个文件的原始文本
    ///
    /// 返回的文本未经归一化；失败时错误中带有文件名
    pub async fn extract(
        &self,
        file_name: &str,
        bytes: &[u8],
        scratch: &ScratchSpace,
    ) -> Result<String, ExtractionError> {
        let format = DocumentFormat::from_file_name(file_name);
        debug!("提取文件: {} ({:?}, {} 字节)", file_name, format, bytes.len());

        self.extract_format(&format, bytes, scratch)
            .await
            .map_err(|kind| ExtractionError::new(file_name, kind))
    }

    async fn extract_format(
        &self,
        format: &DocumentFormat,
        bytes: &[u8],
        scratch: &ScratchSpace,
    ) -> Result<String, ExtractionErrorKind> {
        match format {
            DocumentFormat::Doc => Err(ExtractionErrorKind::UnsupportedFormat {
                extension: "doc".to_string(),
            }),
            DocumentFormat::Unsupported(extension) => Err(ExtractionErrorKind::UnsupportedFormat {
                extension: extension.clone(),
            }),
            _ if bytes.is_empty() => Err(ExtractionErrorKind::EmptyFile),
            DocumentFormat::Pdf => self.extract_pdf(bytes, scratch).await,
            DocumentFormat::Docx => extract_docx(bytes),
            DocumentFormat::Txt => Ok(String::from_utf8_lossy(bytes).into_owned()),
            DocumentFormat::Image(kind) => self.extract_image(*kind, bytes, scratch).await,
        }
    }

    async fn extract_pdf(
        &self,
        bytes: &[u8],
        scratch: &ScratchSpace,
    ) -> Result<String, ExtractionErrorKind> {
        let owned = bytes.to_vec();
        let content = tokio::task::spawn_blocking(move || read_pdf(&owned))
            .await
            .map_err(|e| ExtractionErrorKind::Io(e.to_string()))??;

        match content {
            PdfContent::Text(text) => Ok(text),
            PdfContent::Scanned { page_count } if self.ocr_enabled => {
                info!("PDF 无文本层 ({} 页)，转入 OCR", page_count);
                let staged = stage(scratch, "ocr", "pdf", bytes).await?;
                let text = self.ocr.recognize_pdf(&staged, scratch.path()).await?;
                Ok(or_ocr_placeholder(text))
            }
            other => {
                let placeholder = other.placeholder().unwrap_or(Placeholder::NoPdfText);
                debug!("PDF 返回提示文本: {}", placeholder);
                Ok(placeholder.text())
            }
        }
    }

    async fn extract_image(
        &self,
        kind: ImageKind,
        bytes: &[u8],
        scratch: &ScratchSpace,
    ) -> Result<String, ExtractionErrorKind> {
        let staged = stage(scratch, "upload", kind.extension(), bytes).await?;
        let converted = scratch.unique_path("converted", "png");

        let target = converted.clone();
        tokio::task::spawn_blocking(move || reencode_as_png(&staged, &target))
            .await
            .map_err(|e| ExtractionErrorKind::Io(e.to_string()))??;

        let text = self.ocr.recognize_image(&converted).await?;
        Ok(or_ocr_placeholder(text))
    }
}

/// 把上传内容写入批次目录
async fn stage(
    scratch: &ScratchSpace,
    prefix: &str,
    extension: &str,
    bytes: &[u8],
) -> Result<PathBuf, ExtractionErrorKind> {
    let path = scratch.unique_path(prefix, extension);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ExtractionErrorKind::Io(e.to_string()))?;
    Ok(path)
}

/// 解码图片并统一转成 RGB8 PNG
fn reencode_as_png(source: &Path, target: &Path) -> Result<(), ExtractionErrorKind> {
    let image = image::ImageReader::open(source)
        .map_err(|e| ExtractionErrorKind::Io(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| ExtractionErrorKind::Io(e.to_string()))?
        .decode()
        .map_err(|e| ExtractionErrorKind::CorruptImage(e.to_string()))?;

    image
        .to_rgb8()
        .save_with_format(target, image::ImageFormat::Png)
        .map_err(|e| ExtractionErrorKind::Io(e.to_string()))
}

fn or_ocr_placeholder(text: String) -> String {
    if text.trim().is_empty() {
        warn!("OCR 完成但没有识别出文字");
        Placeholder::NoOcrText.text()
    } else {
        text
    }
}

/// 读取 DOCX 正文的文本，段落之间换行
///
/// 表格按行、单元格的顺序展开，单元格中的每个段落单独成行
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionErrorKind> {
    use docx_rs::DocumentChild;

    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ExtractionErrorKind::CorruptInput(e.to_string()))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => lines.push(paragraph_text(para)),
            DocumentChild::Table(table) => table_lines(table, &mut lines),
            _ => {}
        }
    }
    lines.retain(|line| !line.is_empty());

    Ok(lines.join("\n"))
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&para.children, &mut text);
    text
}

/// 超链接里的 run 与普通 run 一样计入段落
fn push_paragraph_children(children: &[docx_rs::ParagraphChild], out: &mut String) {
    use docx_rs::{ParagraphChild, RunChild};

    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    if let RunChild::Text(t) = rc {
                        out.push_str(&t.text);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

fn table_lines(table: &docx_rs::Table, lines: &mut Vec<String>) {
    use docx_rs::{TableCellContent, TableChild, TableRowChild};

    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(para) => lines.push(paragraph_text(para)),
                    TableCellContent::Table(nested) => table_lines(nested, lines),
                    _ => {}
                }
            }
        }
    }
}
