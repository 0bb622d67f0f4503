//! 文本归一化
//!
//! 把各种格式提取出的原始文本整理成单行、单空格分隔的纯文本

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Placeholder;

static MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 归一化提取文本
///
/// 提示文本原样返回；其余文本依次：去掉 `\r`，多个换行变一个空格，
/// 单个换行变空格，连续空白压缩为一个空格，去掉首尾空白
pub fn normalize(raw: &str) -> String {
    if Placeholder::matches(raw) {
        return raw.to_string();
    }

    let text = raw.replace('\r', "");
    let text = MULTI_NEWLINE.replace_all(&text, " ");
    let text = text.replace('\n', " ");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_line_breaks_and_spaces() {
        assert_eq!(
            normalize("  Cell theory\r\n\r\n\r\nAll living\tthings\nare   made of cells  "),
            "Cell theory All living things are made of cells"
        );
    }

    #[test]
    fn test_is_idempotent() {
        let samples = [
            "",
            "   ",
            "a\n\n\nb",
            "\r\r\n x \t y \n",
            "already clean",
            "unicode\u{00a0}space\u{3000}全角",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_placeholder_is_unchanged() {
        let text = Placeholder::ImageOnlyPdf { image_count: 2 }.text();
        assert_eq!(normalize(&text), text);
        let text = Placeholder::EncryptedPdf.text();
        assert_eq!(normalize(&text), text);
    }
}
