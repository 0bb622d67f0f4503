use serde::Serialize;

use crate::models::question::PersistedQuestion;

/// 出题流程的终止状态
///
/// 请求在分批期间没有对外可见的中间状态，结束时落到下面三者之一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStatus {
    /// 已达到请求数量
    Succeeded,
    /// 数量不足：保存了部分题目，或次数未用尽但候选题全部被丢弃
    Partial,
    /// 请求次数用尽，一道题也没有保存
    Exhausted,
}

impl GenerationStatus {
    /// 根据保存数量和已用请求次数确定终止状态
    pub fn terminal(
        delivered: usize,
        requested: usize,
        attempts_used: usize,
        max_attempts: usize,
    ) -> Self {
        if delivered >= requested {
            GenerationStatus::Succeeded
        } else if delivered == 0 && attempts_used >= max_attempts {
            GenerationStatus::Exhausted
        } else {
            GenerationStatus::Partial
        }
    }
}

/// 一次出题请求的最终结果
///
/// 数量不足不是错误，只体现在状态和消息中
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub requested: usize,
    pub delivered: usize,
    pub attempts_used: usize,
    pub status: GenerationStatus,
    pub from_content: bool,
    pub questions: Vec<PersistedQuestion>,
}

impl GenerationOutcome {
    pub fn message(&self) -> String {
        let suffix = if self.from_content { " from content" } else { "" };
        format!(
            "Generated and saved {} of {} requested questions{}",
            self.delivered, self.requested, suffix
        )
    }
}
