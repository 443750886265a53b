/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 批次清单文件路径（存在时优先于目录扫描）
    pub manifest_file: String,
    /// 图片存放目录（无清单时扫描）
    pub image_folder: String,
    /// 输出目录（每张图一个 .txt + errors.txt + summary.json）
    pub output_folder: String,
    /// 提示词风格标识
    pub prompt_style: String,
    /// 描述前缀（空字符串表示不加）
    pub prefix: String,
    /// 描述后缀（空字符串表示不加）
    pub suffix: String,
    /// 最大字符数（None 表示用风格默认值）
    pub max_chars: Option<usize>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- 视觉模型配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 图片细节档位：auto / low / high
    pub image_detail: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// 是否把远程图片下载后内联为 data URL（本地推理服务需要）
    pub inline_remote_images: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_file: "batch.toml".to_string(),
            image_folder: "images".to_string(),
            output_folder: "captions".to_string(),
            prompt_style: "descriptive".to_string(),
            prefix: String::new(),
            suffix: String::new(),
            max_chars: None,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            llm_api_key: "ollama".to_string(),
            llm_api_base_url: "http://localhost:11434/v1".to_string(),
            llm_model_name: "llava:13b".to_string(),
            image_detail: "auto".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
            inline_remote_images: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            manifest_file: std::env::var("BATCH_MANIFEST").unwrap_or(default.manifest_file),
            image_folder: std::env::var("IMAGE_FOLDER").unwrap_or(default.image_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            prompt_style: std::env::var("PROMPT_STYLE").unwrap_or(default.prompt_style),
            prefix: std::env::var("CAPTION_PREFIX").unwrap_or(default.prefix),
            suffix: std::env::var("CAPTION_SUFFIX").unwrap_or(default.suffix),
            max_chars: std::env::var("MAX_CHARS").ok().and_then(|v| v.parse().ok()).filter(|v| *v > 0),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            image_detail: std::env::var("IMAGE_DETAIL").unwrap_or(default.image_detail),
            temperature: std::env::var("TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.temperature),
            max_tokens: std::env::var("MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_tokens),
            inline_remote_images: std::env::var("INLINE_REMOTE_IMAGES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.inline_remote_images),
        }
    }
}
