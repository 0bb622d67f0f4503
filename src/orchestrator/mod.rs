//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_extractor` - 批量文本提取
//! - 为每个上传文件确定名称
//! - 控制并发数量（buffer_unordered）
//! - 持有一批的临时目录，结束时统一清理
//!
//! ### `generation` - 出题编排
//! - 分批请求 AI、重试、限流等待
//! - 归一化答案并逐道保存
//!
//! ### `app` - 命令行应用
//! - 创建协作者（OCR、LLM、存储）
//! - 串联提取和出题，输出统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app
//!  ├─ batch_extractor (处理 Vec<UploadedFile>)
//!  │     ↓
//!  │  services::DocumentExtractor (处理单个文件)
//!  │     ↓
//!  │  infrastructure (ScratchSpace / OcrEngine)
//!  │
//!  └─ generation (处理一个 GenerationRequest)
//!        ↓
//!     workflow::BatchFlow (处理一批)
//!        ↓
//!     services (prompt / parser / answer) + clients (LLM / 存储)
//! ```

pub mod app;
pub mod batch_extractor;
pub mod generation;

// 重新导出主要类型
pub use app::App;
pub use batch_extractor::BatchExtractionCoordinator;
pub use generation::GenerationOrchestrator;
