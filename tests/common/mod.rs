#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use exam_forge::error::LlmError;
use exam_forge::{Config, ExtractionErrorKind, LlmClient, OcrEngine};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// 测试配置：不等待，临时目录放在指定位置
pub fn test_config(scratch_root: &Path) -> Config {
    Config {
        ocr_enabled: false,
        scratch_root: Some(scratch_root.to_path_buf()),
        retry_delay: Duration::ZERO,
        pacing_delay: Duration::ZERO,
        ..Config::default()
    }
}

/// 按提示词中的数量返回题目
pub struct EchoLlm {
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<usize>>,
}

impl EchoLlm {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for EchoLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let n = prompt
            .split_whitespace()
            .find_map(|word| word.parse::<usize>().ok())
            .unwrap_or(0);
        self.requested.lock().unwrap().push(n);
        Ok(questions_json(n))
    }
}

/// 总是返回没有题目的回复
pub struct SilentLlm {
    pub calls: AtomicUsize,
}

impl SilentLlm {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmClient for SilentLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("[]".to_string())
    }
}

pub fn questions_json(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"question":"Question {i}","optionA":"a","optionB":"b","optionC":"c","optionD":"d","correctAns":"A"}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}

/// 返回固定文本的 OCR 引擎
pub struct FixedOcr(pub &'static str);

#[async_trait]
impl OcrEngine for FixedOcr {
    async fn recognize_image(&self, _image: &Path) -> Result<String, ExtractionErrorKind> {
        Ok(self.0.to_string())
    }

    async fn recognize_pdf(
        &self,
        _pdf: &Path,
        _work_dir: &Path,
    ) -> Result<String, ExtractionErrorKind> {
        Ok(self.0.to_string())
    }
}

/// 生成 PDF，None 表示空白页
pub fn pdf_bytes(pages: &[Option<&str>]) -> Vec<u8> {
    to_bytes(build_pdf(pages))
}

pub fn encrypted_pdf_bytes() -> Vec<u8> {
    let mut doc = build_pdf(&[Some("top secret")]);
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

fn build_pdf(pages: &[Option<&str>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            Content { operations }.encode().unwrap(),
        ));
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

fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run};

    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
    });
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}

/// 单个表格组成的文档，每个元素是一行的单元格
pub fn docx_table_bytes(rows: &[&[&str]]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

    let rows = rows
        .iter()
        .map(|cells| {
            TableRow::new(
                cells
                    .iter()
                    .map(|text| {
                        TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
                    })
                    .collect(),
            )
        })
        .collect();
    let mut cursor = Cursor::new(Vec::new());
    Docx::new()
        .add_table(Table::new(rows))
        .build()
        .pack(&mut cursor)
        .unwrap();
    cursor.into_inner()
}

pub fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 0]));
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    cursor.into_inner()
}
