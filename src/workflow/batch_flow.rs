//! 单批出题流程 - 流程层
//!
//! 一批的完整步骤：构建提示词 → 调用 AI → 修复解析回复
//!
//! 不做重试、不做保存，这些由编排层决定

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::LlmClient;
use crate::models::{GeneratedQuestion, GenerationRequest};
use crate::services::{prompt_builder, response_parser};
use crate::utils::truncate_text;
use crate::workflow::generation_ctx::GenerationCtx;

/// 一批的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResult {
    /// 解析出至少一道题（数量可能少于或多于请求）
    Delivered(Vec<GeneratedQuestion>),
    /// 回复中没有可用题目
    Empty,
    /// AI 调用失败
    UpstreamFailed(String),
}

impl BatchResult {
    /// 两种失败情况都视为空结果
    pub fn into_questions(self) -> Vec<GeneratedQuestion> {
        match self {
            BatchResult::Delivered(questions) => questions,
            BatchResult::Empty | BatchResult::UpstreamFailed(_) => Vec::new(),
        }
    }
}

/// 单批出题流程
pub struct BatchFlow {
    llm: Arc<dyn LlmClient>,
}

impl BatchFlow {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn run(
        &self,
        request: &GenerationRequest,
        batch_size: usize,
        ctx: &GenerationCtx,
    ) -> BatchResult {
        let prompt = prompt_builder::build_prompt(request, batch_size);

        let reply = match self.llm.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("{} AI 调用失败: {}", ctx, e);
                return BatchResult::UpstreamFailed(e.to_string());
            }
        };
        debug!("{} AI 回复: {}", ctx, truncate_text(&reply, 200));

        let questions = response_parser::parse(&reply);
        if questions.is_empty() {
            warn!("{} AI 回复中没有可用题目", ctx);
            BatchResult::Empty
        } else {
            debug!("{} 本批解析出 {} 道题", ctx, questions.len());
            BatchResult::Delivered(questions)
        }
    }
}
