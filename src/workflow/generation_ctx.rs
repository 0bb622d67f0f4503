//! 出题上下文
//!
//! 封装"这些题属于哪场考试、由谁创建"这一信息

use std::fmt::Display;

use crate::error::RequestError;

/// 出题上下文
#[derive(Debug, Clone)]
pub struct GenerationCtx {
    /// 考试ID
    pub exam_id: String,

    /// 创建者ID
    pub creator_id: String,
}

impl GenerationCtx {
    /// 创建上下文，ID 不能为空
    pub fn new(
        exam_id: impl Into<String>,
        creator_id: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let exam_id = exam_id.into().trim().to_string();
        let creator_id = creator_id.into().trim().to_string();
        if exam_id.is_empty() {
            return Err(RequestError::MissingExamId);
        }
        if creator_id.is_empty() {
            return Err(RequestError::MissingCreatorId);
        }
        Ok(Self {
            exam_id,
            creator_id,
        })
    }
}

impl Display for GenerationCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[考试 ID#{} 创建者#{}]", self.exam_id, self.creator_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_ids() {
        assert_eq!(
            GenerationCtx::new(" ", "teacher").unwrap_err(),
            RequestError::MissingExamId
        );
        assert_eq!(
            GenerationCtx::new("exam-1", "").unwrap_err(),
            RequestError::MissingCreatorId
        );
        let ctx = GenerationCtx::new(" exam-1 ", "teacher").unwrap();
        assert_eq!(ctx.exam_id, "exam-1");
        assert_eq!(ctx.to_string(), "[考试 ID#exam-1 创建者#teacher]");
    }
}
