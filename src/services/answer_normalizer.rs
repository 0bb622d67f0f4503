//! 正确答案归一化

use tracing::debug;

use crate::models::{AnswerLetter, GeneratedQuestion};

const ANSWER_HINTS: [&str; 2] = ["correct", "true"];

/// 确定题目的正确答案字母
///
/// 已是 A-D 时原样返回；否则取第一个含有 "correct" 或 "true"（不区分大小写）的选项；
/// 都没有时随机选一个
pub fn resolve_answer(question: &GeneratedQuestion) -> AnswerLetter {
    if let Some(letter) = question.answer_letter() {
        return letter;
    }

    if let Some(letter) = hinted_option(question) {
        debug!(
            "答案 {:?} 无效，根据选项内容推断为 {}",
            question.correct_ans, letter
        );
        return letter;
    }

    let letter = AnswerLetter::ALL[fastrand::usize(..AnswerLetter::ALL.len())];
    debug!("答案 {:?} 无效，随机指定为 {}", question.correct_ans, letter);
    letter
}

/// 返回答案已归一化的题目
pub fn normalize(mut question: GeneratedQuestion) -> GeneratedQuestion {
    let letter = resolve_answer(&question);
    question.correct_ans = Some(letter.to_string());
    question
}

fn hinted_option(question: &GeneratedQuestion) -> Option<AnswerLetter> {
    question.options().into_iter().find_map(|(letter, text)| {
        let lower = text.to_lowercase();
        ANSWER_HINTS
            .iter()
            .any(|hint| lower.contains(hint))
            .then_some(letter)
    })
}
