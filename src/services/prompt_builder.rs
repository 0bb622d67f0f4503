//! 出题提示词构建
//!
//! 两种提示词都要求 AI 返回同样的 JSON 字段：
//! question, optionA, optionB, optionC, optionD, correctAns

use crate::models::{GenerationRequest, GenerationSource};

const QUESTION_FORMAT: &str = r#"Format each question in JSON like this: { "question": "What is the question?", "optionA": "First option", "optionB": "Second option", "optionC": "Third option", "optionD": "Fourth option", "correctAns": "A" }"#;

const OUTPUT_RULES: &str = "The correct answer should be one of: A, B, C, or D. Do not include backticks, code blocks, or any markdown formatting in your response.";

/// 为一个批次构建提示词
///
/// `batch_size` 是本批要求的题目数量，不一定等于请求总数
pub fn build_prompt(request: &GenerationRequest, batch_size: usize) -> String {
    let difficulty = request.difficulty_level();
    match &request.source {
        GenerationSource::Topic {
            subject,
            topic,
            specific_areas,
        } => topic_prompt(subject, topic, specific_areas, difficulty, batch_size),
        GenerationSource::Content { source_text } => {
            content_prompt(source_text, difficulty, batch_size)
        }
    }
}

fn topic_prompt(
    subject: &str,
    topic: &str,
    specific_areas: &[String],
    difficulty: &str,
    batch_size: usize,
) -> String {
    format!(
        "Create {count} multiple-choice questions about {topic} in the subject of {subject}{areas} \
         with {difficulty} difficulty level. \
         Each question should have exactly 4 options (A, B, C, D) with one correct answer. \
         {QUESTION_FORMAT} \
         Provide an array of {count} question objects in this format. \
         {OUTPUT_RULES}",
        count = batch_size,
        areas = focus_clause(specific_areas),
    )
}

fn content_prompt(source_text: &str, difficulty: &str, batch_size: usize) -> String {
    format!(
        "Generate {count} multiple-choice questions based on the following content. \
         Each question should have exactly 4 options (A, B, C, D) with one correct answer. \
         Make questions with {difficulty} difficulty level. \
         {QUESTION_FORMAT} \
         Provide an array of {count} question objects in this format. \
         {OUTPUT_RULES} \
         Here's the content to use: \n\n{source_text}",
        count = batch_size,
    )
}

/// 重点范围子句，没有有效范围时为空
fn focus_clause(specific_areas: &[String]) -> String {
    let areas: Vec<&str> = specific_areas
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if areas.is_empty() {
        String::new()
    } else {
        format!(" focusing specifically on: {}", areas.join(", "))
    }
}
