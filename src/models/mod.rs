pub mod document;
pub mod exam;
pub mod loaders;
pub mod outcome;
pub mod placeholder;
pub mod question;
pub mod request;

pub use document::{
    combine_extracted_text, BatchExtraction, DetectedFormat, DocumentFormat, ExtractionResult,
    ImageKind, UploadedFile,
};
pub use exam::{Exam, ExamCatalog};
pub use loaders::load_exam_catalog;
pub use outcome::{GenerationOutcome, GenerationStatus};
pub use placeholder::Placeholder;
pub use question::{AnswerLetter, GeneratedQuestion, PersistedQuestion};
pub use request::{GenerationRequest, GenerationSource, DEFAULT_DIFFICULTY};
