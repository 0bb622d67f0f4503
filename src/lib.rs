//! # Exam Forge
//!
//! 从上传的文档中提取文本，并调用 AI 批量生成选择题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `ScratchSpace` - 一批提取独占的临时目录
//! - `OcrEngine` / `TesseractEngine` - 图片和 PDF 的 OCR 能力
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 外部协作者
//! - `LlmClient` / `OpenAiClient` - 对话式补全
//! - `QuestionStore` - 保存题目、查询考试
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力只处理一个对象
//! - `DocumentExtractor` - 单个文件的文本提取
//! - `text_normalizer` / `prompt_builder` / `response_parser` / `answer_normalizer`
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一批题"的完整处理流程
//! - `GenerationCtx` - 上下文封装（exam_id + creator_id）
//! - `BatchFlow` - 提示词 → AI → 修复解析
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/batch_extractor` - 批量文本提取，管理临时目录和并发
//! - `orchestrator/generation` - 分批、重试、保存
//! - `orchestrator/app` - 命令行入口
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{JsonlQuestionStore, LlmClient, MemoryQuestionStore, OpenAiClient, QuestionStore};
pub use config::Config;
pub use error::{AppError, AppResult, ExtractionError, ExtractionErrorKind};
pub use infrastructure::{OcrEngine, ScratchSpace, TesseractEngine};
pub use models::{
    BatchExtraction, ExtractionResult, GenerationOutcome, GenerationRequest, GenerationStatus,
    Placeholder, UploadedFile,
};
pub use orchestrator::{App, BatchExtractionCoordinator, GenerationOrchestrator};
pub use services::DocumentExtractor;
pub use workflow::{BatchFlow, BatchResult, GenerationCtx};
