//! PDF 文本层读取
//!
//! 只负责解析 PDF 结构和文本层，是否走 OCR 由调用方决定

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::ExtractionErrorKind;
use crate::models::Placeholder;

const TRAILER_KEYWORD: &[u8] = b"trailer";
const STARTXREF_KEYWORD: &[u8] = b"startxref";
const ENCRYPT_KEY: &[u8] = b"/Encrypt";

/// PDF 文本层的读取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfContent {
    /// 有可用的文本层
    Text(String),
    /// 文档已加密
    Encrypted,
    /// 有页面但没有文本层，页数作为图片数量的估计
    Scanned { page_count: usize },
    /// 没有页面也没有文本
    Empty,
}

impl PdfContent {
    /// 无法得到正文时对应的提示文本
    ///
    /// `Scanned` 只在不做 OCR 时使用这个提示
    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            PdfContent::Text(_) => None,
            PdfContent::Encrypted => Some(Placeholder::EncryptedPdf),
            PdfContent::Scanned { page_count } => Some(Placeholder::ImageOnlyPdf {
                image_count: *page_count,
            }),
            PdfContent::Empty => Some(Placeholder::NoPdfText),
        }
    }
}

/// 读取 PDF 文本层（阻塞调用）
pub fn read_pdf(bytes: &[u8]) -> Result<PdfContent, ExtractionErrorKind> {
    let doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) if trailer_declares_encryption(bytes) => {
            debug!("加密 PDF 无法解析: {}", e);
            return Ok(PdfContent::Encrypted);
        }
        Err(e) => return Err(ExtractionErrorKind::CorruptInput(e.to_string())),
    };

    if doc.is_encrypted() || doc.trailer.get(b"Encrypt").is_ok() {
        return Ok(PdfContent::Encrypted);
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Ok(PdfContent::Empty);
    }

    let text = match doc.extract_text(&page_numbers) {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF 文本层提取失败，按无文本处理: {}", e);
            String::new()
        }
    };

    if text.trim().is_empty() {
        debug!("PDF 无文本层，共 {} 页", page_numbers.len());
        Ok(PdfContent::Scanned {
            page_count: page_numbers.len(),
        })
    } else {
        Ok(PdfContent::Text(text))
    }
}

/// 最后一个 trailer 字典中是否带有 /Encrypt 键
///
/// 只看文件末尾的 trailer 到 startxref 之间，正文里出现的同名文字不算
fn trailer_declares_encryption(bytes: &[u8]) -> bool {
    let Some(start) = rfind(bytes, TRAILER_KEYWORD) else {
        return false;
    };
    let tail = &bytes[start..];
    let end = find(tail, STARTXREF_KEYWORD).unwrap_or(tail.len());
    find(&tail[..end], ENCRYPT_KEY).is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// 生成 PDF，每个元素对应一页，None 表示空白页
    pub fn pdf_with_pages(pages: &[Option<&str>]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    pub fn to_bytes(mut doc: Document) -> Vec<u8> {
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    /// 在 trailer 中加入 Standard 加密字典
    pub fn encrypted_pdf() -> Vec<u8> {
        let mut doc = pdf_with_pages(&[Some("secret")]);
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "O" => Object::string_literal(vec![0u8; 32]),
            "U" => Object::string_literal(vec![0u8; 32]),
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);
        to_bytes(doc)
    }
}
