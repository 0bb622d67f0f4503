use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::placeholder::Placeholder;

/// 根据文件扩展名声明的文档格式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    /// 旧版二进制 Word 文档，明确不支持
    Doc,
    Txt,
    Image(ImageKind),
    /// 无法识别的扩展名（保留原扩展名用于报错）
    Unsupported(String),
}

/// 支持 OCR 的图片类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
        }
    }
}

impl DocumentFormat {
    /// 从文件名推断格式，扩展名大小写不敏感
    ///
    /// 没有扩展名（或点号在首尾）时视为不支持
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = file_extension(file_name).to_lowercase();
        match extension.as_str() {
            "pdf" => DocumentFormat::Pdf,
            "docx" => DocumentFormat::Docx,
            "doc" => DocumentFormat::Doc,
            "txt" => DocumentFormat::Txt,
            "jpg" | "jpeg" => DocumentFormat::Image(ImageKind::Jpeg),
            "png" => DocumentFormat::Image(ImageKind::Png),
            _ => DocumentFormat::Unsupported(extension),
        }
    }

    /// 结果中上报的格式标签
    pub fn detected(&self) -> DetectedFormat {
        match self {
            DocumentFormat::Pdf => DetectedFormat::Pdf,
            DocumentFormat::Docx => DetectedFormat::Docx,
            DocumentFormat::Txt => DetectedFormat::Txt,
            DocumentFormat::Image(_) => DetectedFormat::Image,
            DocumentFormat::Doc | DocumentFormat::Unsupported(_) => DetectedFormat::Unsupported,
        }
    }
}

fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx < file_name.len() - 1 => &file_name[idx + 1..],
        _ => "",
    }
}

/// 提取结果中的格式标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedFormat {
    Pdf,
    Docx,
    Txt,
    Image,
    Unsupported,
}

impl fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DetectedFormat::Pdf => "pdf",
            DetectedFormat::Docx => "docx",
            DetectedFormat::Txt => "txt",
            DetectedFormat::Image => "image",
            DetectedFormat::Unsupported => "unsupported",
        };
        f.write_str(tag)
    }
}

/// 上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 原始文件名，可能缺失
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            bytes: bytes.into(),
        }
    }

    /// 没有文件名的上传
    pub fn unnamed(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: None,
            bytes: bytes.into(),
        }
    }

    /// 从磁盘读取文件
    ///
    /// 文件名不是合法 UTF-8 时按缺失处理
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Ok(Self { file_name, bytes })
    }
}

/// 单个文件的提取结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub source_name: String,
    pub detected_format: DetectedFormat,
    pub text: Option<String>,
    pub succeeded: bool,
    pub failure_reason: Option<String>,
}

impl ExtractionResult {
    pub fn success(source_name: String, detected_format: DetectedFormat, text: String) -> Self {
        Self {
            source_name,
            detected_format,
            text: Some(text),
            succeeded: true,
            failure_reason: None,
        }
    }

    pub fn failure(source_name: String, detected_format: DetectedFormat, reason: String) -> Self {
        Self {
            source_name,
            detected_format,
            text: None,
            succeeded: false,
            failure_reason: Some(reason),
        }
    }
}

/// 一次批量提取的全部结果，按文件名排序
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchExtraction {
    pub results: BTreeMap<String, ExtractionResult>,
}

impl BatchExtraction {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.values().filter(|r| r.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn get(&self, source_name: &str) -> Option<&ExtractionResult> {
        self.results.get(source_name)
    }

    pub fn message(&self) -> String {
        format!(
            "Processed {} files ({} successful, {} failed)",
            self.total(),
            self.succeeded(),
            self.failed()
        )
    }

    /// 合并所有成功且非空的提取文本，段落之间空一行
    pub fn combine_text(&self) -> Option<String> {
        combine_extracted_text(self.results.values())
    }
}

/// 合并提取文本，没有可用内容时返回 None
///
/// 提示文本不是文档内容，不参与合并
pub fn combine_extracted_text<'a>(
    results: impl IntoIterator<Item = &'a ExtractionResult>,
) -> Option<String> {
    let combined = results
        .into_iter()
        .filter(|r| r.succeeded)
        .filter_map(|r| r.text.as_deref())
        .filter(|t| !t.trim().is_empty() && !Placeholder::matches(t))
        .collect::<Vec<_>>()
        .join("\n\n");

    let combined = combined.trim();
    if combined.is_empty() {
        None
    } else {
        Some(combined.to_string())
    }
}
