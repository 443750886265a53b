//! 图片描述流程 - 流程层
//!
//! 核心职责：定义"一张图"的完整处理流程
//!
//! 流程顺序：生成原始描述 → 后处理 → 产出结果项
//!
//! 单张图片的失败在这里被转换为失败标记（数据），
//! 不向上抛错，保证一张坏图不会中断批次。

use tracing::{debug, error, info};

use crate::models::caption::{BatchItem, CaptionOutcome, CaptionRequest};
use crate::services::{post_processor, CaptionGenerator};
use crate::utils::logging::truncate_text;
use crate::workflow::caption_ctx::CaptionCtx;

/// 图片描述流程
///
/// - 编排单张图片的生成和后处理
/// - 不持有任何资源（HTTP 客户端在 generator 背后）
/// - 只依赖业务能力（services）
pub struct CaptionFlow<G: CaptionGenerator> {
    generator: G,
    verbose_logging: bool,
}

impl<G: CaptionGenerator> CaptionFlow<G> {
    /// 创建新的图片描述流程
    pub fn new(generator: G, verbose_logging: bool) -> Self {
        Self {
            generator,
            verbose_logging,
        }
    }

    /// 处理一张图片
    ///
    /// # 参数
    /// - `request`: 描述任务
    /// - `ctx`: 上下文（序号/总数，用于日志）
    ///
    /// # 返回
    /// 永远返回一个结果项：成功是最终文本，失败是带信息的失败标记。
    /// 文件名在两种情况下都按同一规则推导。
    pub async fn run_one(&self, request: &CaptionRequest, ctx: &CaptionCtx) -> BatchItem {
        let file_name = request.output_file_name();

        info!(
            "[图片 {}/{}] 🖼️ 正在生成描述: {}",
            ctx.item_index, ctx.total, request.name
        );

        match self.generator.generate(request).await {
            Ok(raw) => {
                if self.verbose_logging {
                    debug!(
                        "[图片 {}] 原始描述: {}",
                        ctx.item_index,
                        truncate_text(&raw, 80)
                    );
                }

                let caption = post_processor::process(&raw, &request.postprocess);
                info!(
                    "[图片 {}] ✓ 描述生成成功 ({} 字符): {}",
                    ctx.item_index,
                    caption.chars().count(),
                    truncate_text(&caption, 80)
                );

                BatchItem {
                    file_name,
                    outcome: CaptionOutcome::Caption(caption),
                }
            }
            Err(e) => {
                error!("[图片 {}] ❌ 描述生成失败: {}", ctx.item_index, e);

                BatchItem {
                    file_name,
                    outcome: CaptionOutcome::Failed(e.to_string()),
                }
            }
        }
    }
}
