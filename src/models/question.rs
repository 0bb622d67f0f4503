use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 正确答案字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [AnswerLetter::A, AnswerLetter::B, AnswerLetter::C, AnswerLetter::D];

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerLetter::A => "A",
            AnswerLetter::B => "B",
            AnswerLetter::C => "C",
            AnswerLetter::D => "D",
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerLetter {
    type Err = ();

    /// 只接受恰好为 A/B/C/D 的字符串
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AnswerLetter::A),
            "B" => Ok(AnswerLetter::B),
            "C" => Ok(AnswerLetter::C),
            "D" => Ok(AnswerLetter::D),
            _ => Err(()),
        }
    }
}

/// AI 生成的一道选择题
///
/// `correct_ans` 保留 AI 原始返回值，经过答案归一化后才保证是 A-D
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(rename = "optionA")]
    pub option_a: String,
    #[serde(rename = "optionB")]
    pub option_b: String,
    #[serde(rename = "optionC")]
    pub option_c: String,
    #[serde(rename = "optionD")]
    pub option_d: String,
    #[serde(rename = "correctAns")]
    pub correct_ans: Option<String>,
}

impl GeneratedQuestion {
    /// 按 A→D 顺序返回选项
    pub fn options(&self) -> [(AnswerLetter, &str); 4] {
        [
            (AnswerLetter::A, self.option_a.as_str()),
            (AnswerLetter::B, self.option_b.as_str()),
            (AnswerLetter::C, self.option_c.as_str()),
            (AnswerLetter::D, self.option_d.as_str()),
        ]
    }

    /// 题干和四个选项是否都非空
    pub fn is_complete(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options().iter().all(|(_, text)| !text.trim().is_empty())
    }

    /// 解析后的正确答案，不是 A-D 时返回 None
    pub fn answer_letter(&self) -> Option<AnswerLetter> {
        self.correct_ans.as_deref().and_then(|s| s.parse().ok())
    }
}

/// 已保存的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQuestion {
    pub question_id: String,
    pub exam_id: String,
    pub creator_id: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_ans: AnswerLetter,
}

impl PersistedQuestion {
    /// 为通过校验的题目分配新的 ID
    pub fn accept(
        question: GeneratedQuestion,
        correct_ans: AnswerLetter,
        exam_id: &str,
        creator_id: &str,
    ) -> Self {
        Self {
            question_id: uuid::Uuid::new_v4().to_string(),
            exam_id: exam_id.to_string(),
            creator_id: creator_id.to_string(),
            question: question.question,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            correct_ans,
        }
    }
}
