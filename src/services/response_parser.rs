//! AI 回复解析与修复
//!
//! 第一步整体解析第一个对象数组；失败时逐个扫描花括号平衡的对象，
//! 解析失败的对象直接跳过。缺少必填字段的对象静默丢弃。

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::GeneratedQuestion;

/// 从 AI 原始回复中解析题目，永远不会失败
pub fn parse(raw: &str) -> Vec<GeneratedQuestion> {
    let cleaned = strip_fences(raw);

    let values = match parse_first_array(&cleaned) {
        Some(values) => values,
        None => {
            debug!("未能整体解析题目数组，改为逐个扫描对象");
            scan_objects(&cleaned)
        }
    };

    let total = values.len();
    let questions: Vec<GeneratedQuestion> = values.iter().filter_map(to_question).collect();
    if questions.len() < total {
        debug!("丢弃 {} 个字段不完整的对象", total - questions.len());
    }
    questions
}

/// 去掉代码块标记和所有反引号
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace('`', "")
}

/// 找到第一个元素以 `{` 开头的数组并整体解析
fn parse_first_array(text: &str) -> Option<Vec<Value>> {
    let bytes = text.as_bytes();
    let start = (0..bytes.len())
        .find(|&i| bytes[i] == b'[' && next_non_whitespace(bytes, i + 1) == Some(b'{'))?;
    let end = matching_bracket(bytes, start)?;

    match serde_json::from_str::<Vec<Value>>(&text[start..=end]) {
        Ok(values) => Some(values),
        Err(e) => {
            debug!("题目数组 JSON 无效: {}", e);
            None
        }
    }
}

fn next_non_whitespace(bytes: &[u8], from: usize) -> Option<u8> {
    bytes[from.min(bytes.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_ascii_whitespace())
}

/// 与 `start` 处 `[` 配对的 `]`，忽略字符串内的括号
fn matching_bracket(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_string = false;
            }
            continue;
        }
        match c {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// 扫描所有花括号平衡的片段，保留同时含 question 和 correctAns 键且能解析的对象
///
/// 已接受对象内部的片段不再重复解析
fn scan_objects(text: &str) -> Vec<Value> {
    let bytes = text.as_bytes();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_string = false;
            }
            continue;
        }
        match c {
            // 对象外的引号属于说明文字
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push((start, i));
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable();

    let mut values = Vec::new();
    let mut accepted_end: Option<usize> = None;
    for (start, end) in spans {
        if accepted_end.is_some_and(|last| start <= last) {
            continue;
        }
        let candidate = &text[start..=end];
        if !candidate.contains("\"question\"") || !candidate.contains("\"correctAns\"") {
            continue;
        }
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => {
                values.push(value);
                accepted_end = Some(end);
            }
            Err(e) => debug!("跳过无法解析的对象: {}", e),
        }
    }
    values
}

/// 字段值转为文本，null、数组、对象视为缺失
fn field_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn to_question(value: &Value) -> Option<GeneratedQuestion> {
    let object = value.as_object()?;
    Some(GeneratedQuestion {
        question: field_text(object, "question")?,
        option_a: field_text(object, "optionA")?,
        option_b: field_text(object, "optionB")?,
        option_c: field_text(object, "optionC")?,
        option_d: field_text(object, "optionD")?,
        correct_ans: field_text(object, "correctAns"),
    })
}
