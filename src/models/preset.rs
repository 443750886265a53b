//! 提示词风格目录
//!
//! 静态的风格表：风格标识 → (系统指令, 用户指令, 默认最大字符数, 过滤短语)。
//! 只在批次开始前用来填充 [`PostProcessConfig`] 和提示词，
//! 加载一次后作为只读数据显式传入请求构建，不参与运行时管线。

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::caption::PostProcessConfig;

/// 一种提示词风格
#[derive(Debug, Clone, Copy)]
pub struct PromptStyle {
    /// 系统指令
    pub system_message: &'static str,
    /// 用户指令
    pub user_prompt: &'static str,
    /// 默认最大字符数（None 表示不限制）
    pub default_max_chars: Option<usize>,
    /// 默认需要删除的模型套话
    pub negative_filters: &'static [&'static str],
}

/// 视觉模型常见的开场套话，大多数风格都要过滤掉
const COMMON_FILTERS: &[&str] = &[
    "this image shows",
    "the image shows",
    "the image depicts",
    "the image features",
    "in this image",
    "this is an image of",
    "the picture shows",
    "a picture of",
];

/// 风格目录（编译期构建，只读）
static PROMPT_STYLES: phf::Map<&'static str, PromptStyle> = phf::phf_map! {
    "descriptive" => PromptStyle {
        system_message: "You are an expert image captioning assistant. \
            Describe exactly what is visible, in natural fluent English, \
            without speculation and without mentioning that you are looking at an image.",
        user_prompt: "Describe this image in one detailed paragraph, covering the main \
            subject, the setting, colors and lighting.",
        default_max_chars: None,
        negative_filters: COMMON_FILTERS,
    },
    "brief" => PromptStyle {
        system_message: "You are an expert image captioning assistant. \
            Answer with a single short sentence and nothing else.",
        user_prompt: "Describe this image in one short sentence.",
        default_max_chars: Some(150),
        negative_filters: COMMON_FILTERS,
    },
    "alt_text" => PromptStyle {
        system_message: "You write alt text for screen readers. Be concrete and concise, \
            never start with phrases like 'image of' or 'picture of'.",
        user_prompt: "Write concise alt text for this image.",
        default_max_chars: Some(125),
        negative_filters: &[
            "an image of",
            "a picture of",
            "a photo of",
            "this image shows",
            "the image shows",
        ],
    },
    "tags" => PromptStyle {
        system_message: "You are an image tagging assistant. Respond only with a \
            comma-separated list of lowercase keywords, most important first. \
            No sentences, no numbering.",
        user_prompt: "List the keywords that describe this image, separated by commas.",
        default_max_chars: Some(380),
        negative_filters: &["here are the keywords", "the keywords are"],
    },
    "marketing" => PromptStyle {
        system_message: "You are a copywriter. Write vivid, appealing product copy \
            based strictly on what is visible in the image.",
        user_prompt: "Write a short, appealing description of this image for a product page.",
        default_max_chars: Some(300),
        negative_filters: COMMON_FILTERS,
    },
};

/// 按标识查找风格
///
/// # 参数
/// - `style_id`: 风格标识（如 "descriptive"）
///
/// # 返回
/// 未知标识返回配置错误
pub fn get(style_id: &str) -> AppResult<&'static PromptStyle> {
    PROMPT_STYLES.get(style_id).ok_or_else(|| {
        AppError::Config(ConfigError::UnknownStyle {
            style: style_id.to_string(),
            known: style_names().collect::<Vec<_>>().join(", "),
        })
    })
}

/// 所有可用的风格标识
pub fn style_names() -> impl Iterator<Item = &'static str> {
    PROMPT_STYLES.keys().copied()
}

impl PromptStyle {
    /// 用本风格的默认值构建后处理参数
    ///
    /// # 参数
    /// - `prefix` / `suffix`: 为空字符串时视为未设置
    /// - `max_chars`: 覆盖本风格的默认值（None 时用默认值）
    /// - `extra_filters`: 追加在默认过滤短语之后
    pub fn to_postprocess_config(
        &self,
        prefix: &str,
        suffix: &str,
        max_chars: Option<usize>,
        extra_filters: &[String],
    ) -> PostProcessConfig {
        let mut negative_filters: Vec<String> =
            self.negative_filters.iter().map(|s| s.to_string()).collect();
        negative_filters.extend(extra_filters.iter().cloned());

        PostProcessConfig {
            prefix: (!prefix.trim().is_empty()).then(|| prefix.to_string()),
            suffix: (!suffix.trim().is_empty()).then(|| suffix.to_string()),
            max_chars: max_chars.or(self.default_max_chars),
            negative_filters,
        }
    }
}
