pub mod llm_client;
pub mod question_store;

pub use llm_client::{LlmClient, OpenAiClient};
pub use question_store::{JsonlQuestionStore, MemoryQuestionStore, QuestionStore};
