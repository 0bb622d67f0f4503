mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use exam_forge::services::{answer_normalizer, response_parser, text_normalizer};
use exam_forge::{
    BatchExtractionCoordinator, GenerationOrchestrator, GenerationRequest, GenerationStatus,
    JsonlQuestionStore, MemoryQuestionStore, Placeholder, ScratchSpace, UploadedFile,
};
use exam_forge::{DocumentExtractor, ExtractionErrorKind};
use tokio_test::{assert_err, assert_ok};

use common::*;

#[test]
fn test_normalize_is_idempotent() {
    let samples = [
        "Title\r\n\r\nFirst paragraph.\nSecond line\t\tend  ",
        "\n\n\n",
        "a  b\u{2003}c",
        "[not a placeholder]\n\nbut bracketed",
    ];
    for raw in samples {
        let once = text_normalizer::normalize(raw);
        assert_eq!(text_normalizer::normalize(&once), once);
        assert!(!once.contains('\n'));
    }
}

#[tokio::test]
async fn test_encrypted_pdf_returns_placeholder() {
    let root = tempfile::tempdir().unwrap();
    let config = test_config(root.path());
    let extractor = DocumentExtractor::new(&config, Arc::new(FixedOcr("unused")));
    let scratch = assert_ok!(ScratchSpace::create(Some(root.path())));

    let text = assert_ok!(
        extractor
            .extract("locked.pdf", &encrypted_pdf_bytes(), &scratch)
            .await
    );
    assert_eq!(text, "[This PDF is encrypted and cannot be processed]");
    scratch.close();
}

#[tokio::test]
async fn test_pdf_text_mentioning_encrypt_is_extracted() {
    let root = tempfile::tempdir().unwrap();
    let config = test_config(root.path());
    let extractor = DocumentExtractor::new(&config, Arc::new(FixedOcr("unused")));
    let scratch = assert_ok!(ScratchSpace::create(Some(root.path())));

    let bytes = pdf_bytes(&[Some("The trailer may hold an /Encrypt entry")]);
    let text = assert_ok!(extractor.extract("lecture.pdf", &bytes, &scratch).await);
    assert!(text.contains("/Encrypt entry"));
    assert!(!Placeholder::matches(&text));
    scratch.close();
}

#[tokio::test]
async fn test_docx_table_text_is_extracted() {
    let root = tempfile::tempdir().unwrap();
    let config = test_config(root.path());
    let extractor = DocumentExtractor::new(&config, Arc::new(FixedOcr("unused")));
    let scratch = assert_ok!(ScratchSpace::create(Some(root.path())));

    let bytes = docx_table_bytes(&[&["Mitochondria produce ATP"]]);
    let text = assert_ok!(extractor.extract("cells.docx", &bytes, &scratch).await);
    assert_eq!(text, "Mitochondria produce ATP");
    scratch.close();
}

#[tokio::test]
async fn test_textless_pdf_placeholders() {
    let root = tempfile::tempdir().unwrap();
    let config = test_config(root.path());
    let extractor = DocumentExtractor::new(&config, Arc::new(FixedOcr("unused")));
    let scratch = ScratchSpace::create(Some(root.path())).unwrap();

    let scanned = extractor
        .extract("scan.pdf", &pdf_bytes(&[None, None, None]), &scratch)
        .await
        .unwrap();
    assert_eq!(scanned, Placeholder::ImageOnlyPdf { image_count: 3 }.text());
    assert!(scanned.contains("3 images"));

    let empty = extractor
        .extract("empty.pdf", &pdf_bytes(&[]), &scratch)
        .await
        .unwrap();
    assert_eq!(empty, "[No text content could be extracted from this PDF]");
}

#[tokio::test]
async fn test_legacy_doc_is_unsupported() {
    let root = tempfile::tempdir().unwrap();
    let config = test_config(root.path());
    let extractor = DocumentExtractor::new(&config, Arc::new(FixedOcr("unused")));
    let scratch = ScratchSpace::create(Some(root.path())).unwrap();

    let err = assert_err!(extractor.extract("Report.DOC", b"binary", &scratch).await);
    assert_eq!(err.file_name, "Report.DOC");
    assert!(matches!(
        err.kind,
        ExtractionErrorKind::UnsupportedFormat { ref extension } if extension == "doc"
    ));
}

#[test]
fn test_parse_fenced_reply() {
    let raw = "```json\n[{\"question\":\"Q1\",\"optionA\":\"a\",\"optionB\":\"b\",\"optionC\":\"c\",\"optionD\":\"d\",\"correctAns\":\"B\"}]\n```";
    let questions = response_parser::parse(raw);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_ans.as_deref(), Some("B"));
}

#[test]
fn test_parse_malformed_array() {
    let raw = r#"Here you go:
[{"question":"Q1","optionA":"a","optionB":"b","optionC":"c","optionD":"d","correctAns":"A"},
 {"question":"Q2","optionA":"a","optionB":"b","optionC":"c","correctAns":"B"}
 {"question": "Q3" "#;
    let questions = response_parser::parse(raw);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question, "Q1");
}

#[test]
fn test_answer_hint_in_option_c() {
    let raw = r#"[{"question":"Q","optionA":"x","optionB":"y","optionC":"This is CORRECT","optionD":"z","correctAns":null}]"#;
    let question = response_parser::parse(raw).remove(0);
    assert_eq!(question.correct_ans, None);
    let normalized = answer_normalizer::normalize(question);
    assert_eq!(normalized.correct_ans.as_deref(), Some("C"));
}

#[tokio::test]
async fn test_thirty_questions_take_two_batches() {
    let root = tempfile::tempdir().unwrap();
    let llm = Arc::new(EchoLlm::new());
    let store = Arc::new(MemoryQuestionStore::new().with_exam("exam-1", "Biology"));
    let orchestrator =
        GenerationOrchestrator::new(&test_config(root.path()), llm.clone(), store.clone());

    let request = GenerationRequest::topic("Biology", "Genetics", vec![], None, 30);
    let outcome = assert_ok!(orchestrator.generate(&request, "exam-1", "teacher-1").await);

    assert_eq!(llm.calls(), 2);
    assert_eq!(*llm.requested.lock().unwrap(), vec![25, 5]);
    assert_eq!(outcome.delivered, 30);
    assert_eq!(outcome.status, GenerationStatus::Succeeded);
    assert_eq!(store.question_count(), 30);
    assert_eq!(
        outcome.message(),
        "Generated and saved 30 of 30 requested questions"
    );
}

#[tokio::test]
async fn test_empty_replies_exhaust_attempts() {
    let root = tempfile::tempdir().unwrap();
    let llm = Arc::new(SilentLlm::new());
    let store = Arc::new(MemoryQuestionStore::new().with_exam("exam-1", "Biology"));
    let orchestrator =
        GenerationOrchestrator::new(&test_config(root.path()), llm.clone(), store.clone());

    let request = GenerationRequest::topic("Biology", "Genetics", vec![], None, 10);
    let outcome = assert_ok!(orchestrator.generate(&request, "exam-1", "teacher-1").await);

    assert_eq!(llm.calls.load(Ordering::SeqCst), 10);
    assert_eq!(outcome.attempts_used, 10);
    assert_eq!(outcome.delivered, 0);
    assert_eq!(outcome.requested, 10);
    assert_eq!(outcome.status, GenerationStatus::Exhausted);
    assert_eq!(store.question_count(), 0);
}

#[tokio::test]
async fn test_batch_extraction_isolates_failures() {
    let root = tempfile::tempdir().unwrap();
    let mut config = test_config(root.path());
    config.ocr_enabled = true;
    let coordinator = BatchExtractionCoordinator::new(&config, Arc::new(FixedOcr("Scanned page")));

    let batch = coordinator
        .extract_all(vec![
            UploadedFile::new("lesson.docx", docx_bytes(&["Atoms", "and molecules"])),
            UploadedFile::new("photo.png", b"\x89PNG broken".to_vec()),
            UploadedFile::new("scan.pdf", pdf_bytes(&[None])),
        ])
        .await;

    assert_eq!(batch.total(), 3);
    assert!(batch.get("lesson.docx").unwrap().succeeded);
    assert!(!batch.get("photo.png").unwrap().succeeded);
    assert!(batch.get("scan.pdf").unwrap().succeeded);
    assert_eq!(
        batch.get("scan.pdf").unwrap().text.as_deref(),
        Some("Scanned page")
    );
    assert_eq!(batch.message(), "Processed 3 files (2 successful, 1 failed)");
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_extracted_content_drives_generation_into_jsonl() {
    let root = tempfile::tempdir().unwrap();
    let exams = root.path().join("exams.toml");
    tokio::fs::write(&exams, "[[exams]]\nexam_id = \"chem-1\"\nexam_name = \"Chemistry\"\n")
        .await
        .unwrap();
    let output = root.path().join("questions.jsonl");
    let scratch_root = root.path().join("scratch");

    let config = test_config(&scratch_root);
    let coordinator = BatchExtractionCoordinator::new(&config, Arc::new(FixedOcr("unused")));
    let batch = coordinator
        .extract_all(vec![
            UploadedFile::new("notes.txt", b"Acids donate protons.\r\n\r\nBases accept them.".to_vec()),
            UploadedFile::unnamed(b"??".to_vec()),
        ])
        .await;
    let content = batch.combine_text().unwrap();
    assert_eq!(content, "Acids donate protons. Bases accept them.");

    let store = Arc::new(assert_ok!(JsonlQuestionStore::open(&exams, &output).await));
    let orchestrator = GenerationOrchestrator::new(&config, Arc::new(EchoLlm::new()), store);
    let request = GenerationRequest::content(content, Some("easy".to_string()), 4);
    let outcome = assert_ok!(orchestrator.generate(&request, "chem-1", "teacher-9").await);

    assert_eq!(outcome.delivered, 4);
    let written = tokio::fs::read_to_string(&output).await.unwrap();
    assert_eq!(written.lines().count(), 4);
    for line in written.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["examId"], "chem-1");
        assert_eq!(value["creatorId"], "teacher-9");
        assert_eq!(value["correctAns"], "A");
    }
    assert_eq!(std::fs::read_dir(&scratch_root).unwrap().count(), 0);
}
