//! 出题编排 - 编排层
//!
//! ## 职责
//!
//! 1. **分批**：每次最多向 AI 请求 `batch_ceiling` 道题
//! 2. **重试**：空结果或调用失败后等待再试，总请求次数不超过 `max_attempts`
//! 3. **保存**：逐道分配 ID、归一化答案、丢弃不完整的题目，达到请求数量即停止
//! 4. **汇报**：数量不足不是错误，只体现在状态和消息中
//!
//! 一个请求内的批次严格串行，等待只挂起当前请求

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clients::{LlmClient, QuestionStore};
use crate::config::Config;
use crate::error::{AppResult, RequestError};
use crate::models::{
    GeneratedQuestion, GenerationOutcome, GenerationRequest, GenerationStatus, PersistedQuestion,
};
use crate::services::answer_normalizer;
use crate::utils::logging::log_batch_start;
use crate::workflow::{BatchFlow, GenerationCtx};

/// 出题编排器
pub struct GenerationOrchestrator {
    flow: BatchFlow,
    store: Arc<dyn QuestionStore>,
    batch_ceiling: usize,
    max_attempts: usize,
    retry_delay: Duration,
    pacing_delay: Duration,
}

impl GenerationOrchestrator {
    pub fn new(config: &Config, llm: Arc<dyn LlmClient>, store: Arc<dyn QuestionStore>) -> Self {
        Self {
            flow: BatchFlow::new(llm),
            store,
            batch_ceiling: config.batch_ceiling.max(1),
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay,
            pacing_delay: config.pacing_delay,
        }
    }

    /// 生成并保存题目
    ///
    /// 只有请求无效、考试不存在或保存失败时返回错误
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        exam_id: &str,
        creator_id: &str,
    ) -> AppResult<GenerationOutcome> {
        request.validate()?;
        let ctx = GenerationCtx::new(exam_id, creator_id)?;

        if self.store.get_exam_by_id(&ctx.exam_id).await?.is_none() {
            return Err(RequestError::ExamNotFound(ctx.exam_id.clone()).into());
        }

        let (accumulated, attempts_used) = self.collect_batches(request, &ctx).await;

        let questions = self.persist(accumulated, request.count, &ctx).await?;

        let status = GenerationStatus::terminal(
            questions.len(),
            request.count,
            attempts_used,
            self.max_attempts,
        );
        let outcome = GenerationOutcome {
            requested: request.count,
            delivered: questions.len(),
            attempts_used,
            status,
            from_content: request.is_content_driven(),
            questions,
        };
        info!("{} {} ({:?})", ctx, outcome.message(), outcome.status);
        Ok(outcome)
    }

    /// 循环请求 AI，直到数量足够或次数用尽
    async fn collect_batches(
        &self,
        request: &GenerationRequest,
        ctx: &GenerationCtx,
    ) -> (Vec<GeneratedQuestion>, usize) {
        let mut accumulated = Vec::new();
        let mut remaining = request.count;
        let mut attempts = 0;

        while remaining > 0 && attempts < self.max_attempts {
            attempts += 1;
            let batch_size = remaining.min(self.batch_ceiling);
            log_batch_start(attempts, self.max_attempts, batch_size, remaining);

            let questions = self.flow.run(request, batch_size, ctx).await.into_questions();
            let has_next = |remaining: usize| remaining > 0 && attempts < self.max_attempts;

            if questions.is_empty() {
                warn!("{} 第 {} 次请求没有得到题目", ctx, attempts);
                if has_next(remaining) {
                    tokio::time::sleep(self.retry_delay).await;
                }
            } else {
                info!("{} ✓ 本批收到 {} 道题", ctx, questions.len());
                remaining = remaining.saturating_sub(questions.len());
                accumulated.extend(questions);
            }

            if has_next(remaining) {
                tokio::time::sleep(self.pacing_delay).await;
            }
        }

        if remaining > 0 {
            warn!(
                "{} 请求次数用尽，仍差 {} 道题",
                ctx, remaining
            );
        }
        (accumulated, attempts)
    }

    /// 逐道保存，达到请求数量后忽略多余题目
    async fn persist(
        &self,
        accumulated: Vec<GeneratedQuestion>,
        requested: usize,
        ctx: &GenerationCtx,
    ) -> AppResult<Vec<PersistedQuestion>> {
        let mut saved = Vec::with_capacity(requested.min(accumulated.len()));

        for question in accumulated {
            if saved.len() >= requested {
                break;
            }
            if !question.is_complete() {
                debug!("{} 丢弃字段不完整的题目: {:?}", ctx, question.question);
                continue;
            }
            let answer = answer_normalizer::resolve_answer(&question);
            let candidate =
                PersistedQuestion::accept(question, answer, &ctx.exam_id, &ctx.creator_id);
            let stored = self.store.create_question(candidate).await?;
            saved.push(stored);
        }

        Ok(saved)
    }
}
