use std::fmt;

/// 无法提取正文时返回的固定提示文本
///
/// 这些文本作为"成功"结果返回给调用方，归一化时原样保留
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// 加密 PDF
    EncryptedPdf,
    /// 没有文本层且未做 OCR 的 PDF
    ImageOnlyPdf { image_count: usize },
    /// 没有页面也没有文本的 PDF
    NoPdfText,
    /// OCR 执行成功但没有识别出文字
    NoOcrText,
}

const ENCRYPTED_PDF: &str = "[This PDF is encrypted and cannot be processed]";
const IMAGE_ONLY_PREFIX: &str = "[This appears to be an image-only PDF with ";
const NO_PDF_TEXT: &str = "[No text content could be extracted from this PDF]";
const NO_OCR_TEXT: &str = "[OCR processing completed but no text was found]";

impl Placeholder {
    pub fn text(self) -> String {
        self.to_string()
    }

    /// 判断文本是否为某个提示文本
    pub fn matches(text: &str) -> bool {
        if text == ENCRYPTED_PDF || text == NO_PDF_TEXT || text == NO_OCR_TEXT {
            return true;
        }
        text.starts_with(IMAGE_ONLY_PREFIX) && text.ends_with(']')
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::EncryptedPdf => f.write_str(ENCRYPTED_PDF),
            Placeholder::ImageOnlyPdf { image_count } => write!(
                f,
                "{}{} images. Consider using OCR processing for this document]",
                IMAGE_ONLY_PREFIX, image_count
            ),
            Placeholder::NoPdfText => f.write_str(NO_PDF_TEXT),
            Placeholder::NoOcrText => f.write_str(NO_OCR_TEXT),
        }
    }
}
