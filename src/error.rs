use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文本提取错误
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 请求校验错误
    #[error("请求错误: {0}")]
    Request(#[from] RequestError),
}

/// 单个文件的提取失败原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionErrorKind {
    /// 不支持的文件格式
    #[error("不支持的文件格式: {extension}")]
    UnsupportedFormat { extension: String },
    /// 空文件
    #[error("文件内容不能为空")]
    EmptyFile,
    /// 无法读取或解码的输入
    #[error("无法解析文件内容: {0}")]
    CorruptInput(String),
    /// 图片无法解码
    #[error("无法读取图片，格式不受支持或文件已损坏: {0}")]
    CorruptImage(String),
    /// OCR 识别失败
    #[error("OCR识别失败: {0}")]
    OcrFailure(String),
    /// 临时文件读写失败
    #[error("临时文件操作失败: {0}")]
    Io(String),
}

/// 带文件名的提取错误，便于批量调用方定位
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("处理文件 '{file_name}' 失败: {kind}")]
pub struct ExtractionError {
    pub file_name: String,
    pub kind: ExtractionErrorKind,
}

impl ExtractionError {
    pub fn new(file_name: impl Into<String>, kind: ExtractionErrorKind) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
        }
    }
}

/// LLM 服务错误（上游生成失败）
#[derive(Debug, Error)]
pub enum LlmError {
    /// 请求构建失败
    #[error("构建LLM请求失败: {0}")]
    RequestBuild(String),
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },
}

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 写入题目失败
    #[error("保存题目 {question_id} 失败: {message}")]
    WriteFailed { question_id: String, message: String },
    /// 读取失败
    #[error("读取 {path} 失败: {message}")]
    ReadFailed { path: String, message: String },
    /// 考试数据解析失败
    #[error("解析考试数据 {path} 失败: {message}")]
    ParseFailed { path: String, message: String },
}

/// 生成请求校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("考试ID不能为空")]
    MissingExamId,
    #[error("创建者ID不能为空")]
    MissingCreatorId,
    #[error("题目数量必须大于0")]
    InvalidCount,
    #[error("科目不能为空")]
    MissingSubject,
    #[error("主题不能为空")]
    MissingTopic,
    #[error("没有可用于出题的有效内容")]
    MissingContent,
    #[error("考试不存在: {0}")]
    ExamNotFound(String),
}

// ========== 便捷构造函数 ==========

impl LlmError {
    /// 创建LLM API调用错误
    pub fn api_failed(model: impl Into<String>, source: impl std::fmt::Display) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            message: source.to_string(),
        }
    }
}

impl StorageError {
    /// 创建题目写入错误
    pub fn write_failed(question_id: impl Into<String>, source: impl std::fmt::Display) -> Self {
        StorageError::WriteFailed {
            question_id: question_id.into(),
            message: source.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
