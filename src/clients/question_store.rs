//! 题目存储客户端
//!
//! 封装"保存一道题"和"查询考试"两种能力

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::exam::{Exam, ExamCatalog};
use crate::models::loaders::load_exam_catalog;
use crate::models::question::PersistedQuestion;

/// 题目存储
///
/// 必须支持多个请求并发调用；同一 question_id 重复保存不会产生第二条记录
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn create_question(
        &self,
        question: PersistedQuestion,
    ) -> Result<PersistedQuestion, StorageError>;

    async fn get_exam_by_id(&self, exam_id: &str) -> Result<Option<Exam>, StorageError>;
}

/// 内存存储
#[derive(Default)]
pub struct MemoryQuestionStore {
    exams: Mutex<HashMap<String, Exam>>,
    questions: Mutex<Vec<PersistedQuestion>>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一场考试
    pub fn with_exam(self, exam_id: impl Into<String>, exam_name: impl Into<String>) -> Self {
        let exam_id = exam_id.into();
        let exam = Exam {
            exam_id: exam_id.clone(),
            exam_name: exam_name.into(),
            creator_id: None,
        };
        lock(&self.exams).insert(exam_id, exam);
        self
    }

    /// 按保存顺序返回全部题目
    pub fn questions(&self) -> Vec<PersistedQuestion> {
        lock(&self.questions).clone()
    }

    pub fn question_count(&self) -> usize {
        lock(&self.questions).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn create_question(
        &self,
        question: PersistedQuestion,
    ) -> Result<PersistedQuestion, StorageError> {
        let mut questions = lock(&self.questions);
        if let Some(existing) = questions
            .iter()
            .find(|q| q.question_id == question.question_id)
        {
            return Ok(existing.clone());
        }
        questions.push(question.clone());
        Ok(question)
    }

    async fn get_exam_by_id(&self, exam_id: &str) -> Result<Option<Exam>, StorageError> {
        Ok(lock(&self.exams).get(exam_id).cloned())
    }
}

/// 文件存储
///
/// 考试清单来自 TOML 文件，题目以 JSON Lines 追加写入输出文件
pub struct JsonlQuestionStore {
    output_path: PathBuf,
    exams: HashMap<String, Exam>,
    written: tokio::sync::Mutex<HashSet<String>>,
}

impl JsonlQuestionStore {
    /// 使用已加载的考试清单创建
    pub fn new(output_path: impl Into<PathBuf>, catalog: ExamCatalog) -> Self {
        let exams = catalog
            .exams
            .into_iter()
            .map(|exam| (exam.exam_id.clone(), exam))
            .collect();
        Self {
            output_path: output_path.into(),
            exams,
            written: tokio::sync::Mutex::new(HashSet::new()),
        }
    }

    /// 从考试清单文件创建
    ///
    /// 输出文件中已有的题目 ID 视为已保存，重启后不会重复写入
    pub async fn open(
        exams_file: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, StorageError> {
        let catalog = load_exam_catalog(&exams_file.into()).await?;
        let store = Self::new(output_path, catalog);

        let existing = load_written_ids(&store.output_path).await?;
        if !existing.is_empty() {
            debug!("输出文件中已有 {} 道题", existing.len());
        }
        *store.written.lock().await = existing;
        Ok(store)
    }
}

/// 读取输出文件中每一行的 questionId；文件不存在时为空
async fn load_written_ids(path: &std::path::Path) -> Result<HashSet<String>, StorageError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => {
            return Err(StorageError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };

    let mut ids = HashSet::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let id = serde_json::from_str::<serde_json::Value>(line)
            .ok()
            .and_then(|value| value.get("questionId")?.as_str().map(str::to_string));
        match id {
            Some(id) => {
                ids.insert(id);
            }
            None => warn!("{} 第 {} 行不是有效的题目记录，跳过", path.display(), index + 1),
        }
    }
    Ok(ids)
}

#[async_trait]
impl QuestionStore for JsonlQuestionStore {
    async fn create_question(
        &self,
        question: PersistedQuestion,
    ) -> Result<PersistedQuestion, StorageError> {
        // 持锁写入，保证同一 ID 只写一次且行不交错
        let mut written = self.written.lock().await;
        if written.contains(&question.question_id) {
            debug!("题目 {} 已保存，跳过", question.question_id);
            return Ok(question);
        }

        let mut line = serde_json::to_string(&question)
            .map_err(|e| StorageError::write_failed(&question.question_id, e))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)
            .await
            .map_err(|e| StorageError::write_failed(&question.question_id, e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StorageError::write_failed(&question.question_id, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::write_failed(&question.question_id, e))?;

        debug!(
            "写入题目: {} | 考试 {}",
            question.question_id, question.exam_id
        );
        written.insert(question.question_id.clone());

        Ok(question)
    }

    async fn get_exam_by_id(&self, exam_id: &str) -> Result<Option<Exam>, StorageError> {
        Ok(self.exams.get(exam_id).cloned())
    }
}
