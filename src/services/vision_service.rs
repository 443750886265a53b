//! 视觉描述服务 - 业务能力层
//!
//! 只负责"让视觉模型看一张图、说一段话"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（托管 API 或本地推理服务如 Ollama / llama.cpp）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::infrastructure::ImageFetcher;
use crate::models::caption::CaptionRequest;
use crate::services::CaptionGenerator;

/// 视觉描述服务
///
/// 职责：
/// - 一次调用处理一张图
/// - 不出现 Vec<CaptionRequest>
/// - 不做后处理，原始文本原样返回（只去首尾空白）
/// - 不做重试，超时/重试语义属于服务端
pub struct VisionService {
    client: Client<OpenAIConfig>,
    fetcher: ImageFetcher,
    model_name: String,
    image_detail: String,
    temperature: f32,
    max_tokens: u32,
    inline_remote_images: bool,
}

impl VisionService {
    /// 创建新的视觉描述服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            fetcher: ImageFetcher::new(),
            model_name: config.llm_model_name.clone(),
            image_detail: config.image_detail.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            inline_remote_images: config.inline_remote_images,
        }
    }

    /// 为一张图片生成原始描述
    ///
    /// # 参数
    /// - `request`: 描述任务（图片 + 系统指令 + 用户指令）
    ///
    /// # 返回
    /// 模型返回的原始文本（未经后处理）
    pub async fn caption_image(&self, request: &CaptionRequest) -> Result<String> {
        debug!("调用视觉模型 API，模型: {}", self.model_name);

        // 把图片来源转换为模型可接受的 URL
        let image_url = self
            .fetcher
            .to_image_url(&request.image, self.inline_remote_images)
            .await?;

        // 构建消息列表
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if !request.system_message.trim().is_empty() {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_message.as_str())
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 用户消息：文本 + 图片两个部分
        let content_parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: request.user_prompt.clone(),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: image_url,
                        detail: Some(parse_detail(&self.image_detail)),
                    },
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(
                content_parts,
            ))
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        // 调用 API
        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("视觉模型 API 调用失败: {}", e);
            anyhow::anyhow!("视觉模型 API 调用失败 (模型: {}): {}", self.model_name, e)
        })?;

        debug!("视觉模型 API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("视觉模型返回内容为空 (模型: {})", self.model_name))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl CaptionGenerator for VisionService {
    async fn generate(&self, request: &CaptionRequest) -> Result<String> {
        self.caption_image(request).await
    }
}

/// 解析图片细节档位（detail/quality hint）
fn parse_detail(value: &str) -> ImageDetail {
    match value.to_ascii_lowercase().as_str() {
        "low" => ImageDetail::Low,
        "high" => ImageDetail::High,
        _ => ImageDetail::Auto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detail() {
        assert!(matches!(parse_detail("low"), ImageDetail::Low));
        assert!(matches!(parse_detail("HIGH"), ImageDetail::High));
        assert!(matches!(parse_detail("auto"), ImageDetail::Auto));
        assert!(matches!(parse_detail("whatever"), ImageDetail::Auto));
    }
}
