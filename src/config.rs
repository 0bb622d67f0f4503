use std::path::PathBuf;
use std::time::Duration;

/// 程序配置
///
/// 启动时构造一次，以引用形式传入各组件，不使用任何全局状态
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,

    // --- OCR 配置 ---
    /// 是否对纯图片 PDF 启用 OCR
    pub ocr_enabled: bool,
    pub tesseract_path: String,
    pub pdftoppm_path: String,
    /// Tesseract 语言数据目录
    pub tessdata_path: String,
    /// 固定识别语言
    pub ocr_language: String,
    /// PDF 栅格化分辨率
    pub ocr_dpi: u32,

    // --- 文本提取配置 ---
    /// 每批临时目录的父目录，None 表示系统临时目录
    pub scratch_root: Option<PathBuf>,
    /// 同一批次内同时提取的文件数
    pub max_concurrent_files: usize,

    // --- 题目生成配置 ---
    /// 单次请求 AI 的最大题目数
    pub batch_ceiling: usize,
    /// 最大请求次数
    pub max_attempts: usize,
    /// 空结果后的重试等待
    pub retry_delay: Duration,
    /// 两次请求之间的限流等待
    pub pacing_delay: Duration,

    // --- 命令行运行配置 ---
    pub exams_file: String,
    pub questions_output_file: String,
    pub exam_id: Option<String>,
    pub creator_id: Option<String>,
    pub question_count: usize,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub specific_areas: Vec<String>,
    pub difficulty: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 8192,
            ocr_enabled: true,
            tesseract_path: "tesseract".to_string(),
            pdftoppm_path: "pdftoppm".to_string(),
            tessdata_path: "/usr/share/tesseract-ocr/5/tessdata".to_string(),
            ocr_language: "eng".to_string(),
            ocr_dpi: 300,
            scratch_root: None,
            max_concurrent_files: 4,
            batch_ceiling: 25,
            max_attempts: 10,
            retry_delay: Duration::from_millis(2000),
            pacing_delay: Duration::from_millis(2000),
            exams_file: "exams.toml".to_string(),
            questions_output_file: "questions.jsonl".to_string(),
            exam_id: None,
            creator_id: None,
            question_count: 0,
            subject: None,
            topic: None,
            specific_areas: Vec::new(),
            difficulty: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: parse_env("LLM_TEMPERATURE").unwrap_or(default.llm_temperature),
            llm_max_tokens: parse_env("LLM_MAX_TOKENS").unwrap_or(default.llm_max_tokens),
            ocr_enabled: parse_env("OCR_ENABLED").unwrap_or(default.ocr_enabled),
            tesseract_path: std::env::var("TESSERACT_PATH").unwrap_or(default.tesseract_path),
            pdftoppm_path: std::env::var("PDFTOPPM_PATH").unwrap_or(default.pdftoppm_path),
            tessdata_path: std::env::var("TESSDATA_PATH").unwrap_or(default.tessdata_path),
            ocr_language: std::env::var("OCR_LANGUAGE").unwrap_or(default.ocr_language),
            ocr_dpi: parse_env("OCR_DPI").unwrap_or(default.ocr_dpi),
            scratch_root: std::env::var("SCRATCH_ROOT").ok().map(PathBuf::from).or(default.scratch_root),
            max_concurrent_files: parse_env("MAX_CONCURRENT_FILES").unwrap_or(default.max_concurrent_files),
            batch_ceiling: parse_env("BATCH_CEILING").unwrap_or(default.batch_ceiling),
            max_attempts: parse_env("MAX_ATTEMPTS").unwrap_or(default.max_attempts),
            retry_delay: parse_env("RETRY_DELAY_MS").map(Duration::from_millis).unwrap_or(default.retry_delay),
            pacing_delay: parse_env("PACING_DELAY_MS").map(Duration::from_millis).unwrap_or(default.pacing_delay),
            exams_file: std::env::var("EXAMS_FILE").unwrap_or(default.exams_file),
            questions_output_file: std::env::var("QUESTIONS_OUTPUT_FILE").unwrap_or(default.questions_output_file),
            exam_id: non_empty_env("EXAM_ID"),
            creator_id: non_empty_env("CREATOR_ID"),
            question_count: parse_env("QUESTION_COUNT").unwrap_or(default.question_count),
            subject: non_empty_env("SUBJECT"),
            topic: non_empty_env("TOPIC"),
            specific_areas: non_empty_env("SPECIFIC_AREAS")
                .map(|v| split_list(&v))
                .unwrap_or(default.specific_areas),
            difficulty: non_empty_env("DIFFICULTY"),
            verbose_logging: parse_env("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 解析逗号分隔的列表，忽略空项
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
