pub mod batch_flow;
pub mod generation_ctx;

pub use batch_flow::{BatchFlow, BatchResult};
pub use generation_ctx::GenerationCtx;
