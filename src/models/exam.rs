use serde::{Deserialize, Serialize};

/// 考试（出题时只需确认其存在）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub exam_id: String,
    pub exam_name: String,
    #[serde(default)]
    pub creator_id: Option<String>,
}

/// 考试清单文件的结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamCatalog {
    #[serde(default)]
    pub exams: Vec<Exam>,
}
