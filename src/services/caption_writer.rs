//! 描述写入服务 - 业务能力层
//!
//! 只负责"把一条结果落盘"能力，不关心流程

use crate::models::caption::BatchItem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 失败条目的汇总文件名
const FAILURE_LOG_FILE: &str = "errors.txt";
/// 批次汇总文件名
const SUMMARY_FILE: &str = "summary.json";

/// 描述写入服务
///
/// 职责：
/// - 成功条目写成 `<基础名>.txt`，内容就是最终文本，无需下游再清洗
/// - 失败条目追加到 errors.txt，仍然带着输出文件名以便对回原图
/// - 批次结束时写出 JSON 汇总
pub struct CaptionWriter {
    output_dir: PathBuf,
}

impl CaptionWriter {
    /// 创建新的描述写入服务，并确保输出目录存在
    pub async fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        tokio::fs::create_dir_all(&output_dir)
            .await
            .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;
        Ok(Self { output_dir })
    }

    /// 写入一条成功的描述
    ///
    /// # 参数
    /// - `file_name`: 输出文件名（`<基础名>.txt`）
    /// - `text`: 后处理完成的最终文本
    pub async fn write_caption(&self, file_name: &str, text: &str) -> Result<()> {
        let path = self.output_dir.join(file_name);
        debug!("写入描述: {} ({} 字符)", path.display(), text.chars().count());

        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("无法写入描述文件: {}", path.display()))?;

        Ok(())
    }

    /// 记录一条失败
    ///
    /// # 参数
    /// - `file_name`: 本应产出的输出文件名
    /// - `message`: 可读的错误信息
    pub async fn record_failure(&self, file_name: &str, message: &str) -> Result<()> {
        let path = self.output_dir.join(FAILURE_LOG_FILE);
        debug!("记录失败: {} | {}", file_name, message);

        let line = format!("{} | {}\n", file_name, message);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("无法打开失败日志: {}", path.display()))?;

        tokio::io::AsyncWriteExt::write_all(&mut file, line.as_bytes())
            .await
            .with_context(|| format!("无法写入失败日志: {}", path.display()))?;

        Ok(())
    }

    /// 写出整个批次的 JSON 汇总
    pub async fn write_summary(&self, items: &[BatchItem]) -> Result<()> {
        let path = self.output_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(items).context("无法序列化批次汇总")?;

        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("无法写入批次汇总: {}", path.display()))?;

        Ok(())
    }

    /// 输出目录
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
