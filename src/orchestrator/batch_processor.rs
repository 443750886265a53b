//! 应用主体 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批次的装配和落盘。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、准备输出目录
//! 2. **批次装配**：清单文件优先，否则扫描图片目录
//! 3. **串行执行**：消费 `batch_runner` 的结果流，边到边写
//! 4. **全局统计**：汇总成功/失败数量并写出 JSON 汇总

use anyhow::Result;
use futures::{pin_mut, StreamExt};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::caption::{CaptionOutcome, CaptionRequest};
use crate::models::loaders;
use crate::orchestrator::batch_runner;
use crate::services::{CaptionWriter, VisionService};
use crate::utils::logging;
use crate::workflow::CaptionFlow;

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config.llm_model_name, &config.prompt_style);

        Ok(Self { config })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 装配批次
        let requests = self.load_requests().await?;

        if requests.is_empty() {
            warn!("⚠️ 没有找到待处理的图片，程序结束");
            return Ok(());
        }

        let total = requests.len();
        logging::log_requests_loaded(total);

        // 构建单图流程和写入服务
        let service = VisionService::new(&self.config);
        let flow = CaptionFlow::new(service, self.config.verbose_logging);
        let writer = CaptionWriter::new(&self.config.output_folder).await?;

        // 串行消费结果流，边到边写
        let batch = batch_runner::stream_batch(flow, requests);
        pin_mut!(batch);

        let mut success = 0usize;
        let mut failed = 0usize;
        let mut summary = Vec::with_capacity(total);

        while let Some(item) = batch.next().await {
            match &item.outcome {
                CaptionOutcome::Caption(text) => {
                    writer.write_caption(&item.file_name, text).await?;
                    success += 1;
                }
                CaptionOutcome::Failed(message) => {
                    writer.record_failure(&item.file_name, message).await?;
                    failed += 1;
                }
            }
            summary.push(item);
        }

        // 写出批次汇总
        writer.write_summary(&summary).await?;

        // 输出最终统计
        logging::print_final_stats(success, failed, total, &self.config.output_log_file);

        Ok(())
    }

    /// 装配描述任务列表
    ///
    /// 清单文件存在时按清单构建，否则扫描图片目录。
    async fn load_requests(&self) -> Result<Vec<CaptionRequest>> {
        let manifest_path = std::path::Path::new(&self.config.manifest_file);

        if manifest_path.exists() {
            info!("\n📁 正在加载批次清单: {}", self.config.manifest_file);
            let manifest = loaders::load_manifest(manifest_path).await?;
            Ok(loaders::manifest_to_requests(&manifest, &self.config)?)
        } else {
            info!("\n📁 正在扫描图片目录: {}", self.config.image_folder);
            loaders::scan_image_folder(&self.config.image_folder, &self.config).await
        }
    }
}
