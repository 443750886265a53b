//! 业务能力层（Services Layer）
//!
//! 描述"我能做什么"，只处理单张图片：
//! - `post_processor` - 描述文本清洗能力（纯函数）
//! - `VisionService` - 视觉模型描述能力
//! - `CaptionWriter` - 结果落盘能力

use crate::models::caption::CaptionRequest;
use anyhow::Result;
use async_trait::async_trait;

pub mod caption_writer;
pub mod post_processor;
pub mod vision_service;

pub use caption_writer::CaptionWriter;
pub use vision_service::VisionService;

/// 描述生成能力
///
/// 编排层只依赖这个接口，不关心背后是托管 API 还是本地推理服务。
/// 单张图片失败时返回错误（带可读信息），由流程层转换为失败标记。
#[async_trait]
pub trait CaptionGenerator: Send + Sync {
    /// 为一张图片生成原始描述
    async fn generate(&self, request: &CaptionRequest) -> Result<String>;
}
