use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// 未指定难度时使用的默认值
pub const DEFAULT_DIFFICULTY: &str = "medium";

/// 出题来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GenerationSource {
    /// 按主题出题
    Topic {
        subject: String,
        topic: String,
        #[serde(default, rename = "specificAreas")]
        specific_areas: Vec<String>,
    },
    /// 按文本内容出题
    Content {
        #[serde(rename = "sourceText")]
        source_text: String,
    },
}

/// 一次出题请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub source: GenerationSource,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub count: usize,
}

impl GenerationRequest {
    pub fn topic(
        subject: impl Into<String>,
        topic: impl Into<String>,
        specific_areas: Vec<String>,
        difficulty: Option<String>,
        count: usize,
    ) -> Self {
        Self {
            source: GenerationSource::Topic {
                subject: subject.into(),
                topic: topic.into(),
                specific_areas,
            },
            difficulty,
            count,
        }
    }

    pub fn content(source_text: impl Into<String>, difficulty: Option<String>, count: usize) -> Self {
        Self {
            source: GenerationSource::Content {
                source_text: source_text.into(),
            },
            difficulty,
            count,
        }
    }

    /// 实际使用的难度，空值回退到 medium
    pub fn difficulty_level(&self) -> &str {
        self.difficulty
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DIFFICULTY)
    }

    pub fn is_content_driven(&self) -> bool {
        matches!(self.source, GenerationSource::Content { .. })
    }

    /// 校验请求字段
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.count == 0 {
            return Err(RequestError::InvalidCount);
        }
        match &self.source {
            GenerationSource::Topic { subject, topic, .. } => {
                if subject.trim().is_empty() {
                    return Err(RequestError::MissingSubject);
                }
                if topic.trim().is_empty() {
                    return Err(RequestError::MissingTopic);
                }
            }
            GenerationSource::Content { source_text } => {
                if source_text.trim().is_empty() {
                    return Err(RequestError::MissingContent);
                }
            }
        }
        Ok(())
    }
}
