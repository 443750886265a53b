//! # Image Caption Batch
//!
//! 一个批量为图片生成描述的 Rust 应用程序：把每张图片交给视觉模型，
//! 对返回的原始描述做确定性的后处理，再逐图写出 `.txt` 结果文件。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 连接池），只暴露能力
//! - `ImageFetcher` - 把图片来源转换为模型可用的 URL
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单张图片
//! - `post_processor` - 描述文本清洗能力（过滤 → 归一化 → 前后缀 → 限长）
//! - `VisionService` - 视觉模型描述能力
//! - `CaptionWriter` - 结果落盘能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张图"的完整处理流程
//! - `CaptionCtx` - 上下文封装（序号 + 总数）
//! - `CaptionFlow` - 流程编排（生成 → 后处理 → 结果项）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - 批次执行器，串行产出有序结果流
//! - `orchestrator/batch_processor` - 应用主体，装配批次并落盘
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::ImageFetcher;
pub use models::{BatchItem, CaptionOutcome, CaptionRequest, ImageSource, PostProcessConfig};
pub use orchestrator::{stream_batch, App};
pub use services::{post_processor, CaptionGenerator, CaptionWriter, VisionService};
pub use workflow::{CaptionCtx, CaptionFlow};
