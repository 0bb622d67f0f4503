pub mod answer_normalizer;
pub mod document_extractor;
pub mod pdf_reader;
pub mod prompt_builder;
pub mod response_parser;
pub mod text_normalizer;

pub use document_extractor::DocumentExtractor;
pub use pdf_reader::PdfContent;
