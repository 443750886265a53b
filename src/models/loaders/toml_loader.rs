//! 批次清单加载
//!
//! 从 TOML 清单文件构建描述任务列表；没有清单时扫描图片目录。
//! 优先级：清单里的值 > 环境配置 > 风格默认值。

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::infrastructure::is_supported_image;
use crate::models::caption::{CaptionRequest, ImageSource};
use crate::models::preset;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 清单中的一张图片
#[derive(Debug, Deserialize)]
pub struct ManifestImage {
    /// 本地文件路径（与 url 二选一）
    pub path: Option<String>,
    /// 远程图片 URL（与 path 二选一）
    pub url: Option<String>,
    /// 标识名称（可选，默认取文件名/URL 末段）
    pub name: Option<String>,
}

/// 批次清单
#[derive(Debug, Deserialize)]
pub struct BatchManifest {
    /// 提示词风格标识（可选，默认用环境配置）
    pub style: Option<String>,
    /// 前缀（可选）
    pub prefix: Option<String>,
    /// 后缀（可选）
    pub suffix: Option<String>,
    /// 最大字符数（可选，必须大于 0）
    pub max_chars: Option<usize>,
    /// 追加的过滤短语
    #[serde(default)]
    pub negative_filters: Vec<String>,
    /// 图片列表
    #[serde(default)]
    pub images: Vec<ManifestImage>,
}

/// 解析清单内容
pub fn parse_manifest(content: &str) -> AppResult<BatchManifest> {
    let manifest: BatchManifest = toml::from_str(content)?;
    if let Some(max_chars) = manifest.max_chars {
        if max_chars == 0 {
            return Err(AppError::Config(ConfigError::InvalidMaxChars {
                value: max_chars,
            }));
        }
    }
    Ok(manifest)
}

/// 从 TOML 文件加载批次清单
pub async fn load_manifest(manifest_path: &Path) -> Result<BatchManifest> {
    let content = fs::read_to_string(manifest_path)
        .await
        .with_context(|| format!("无法读取清单文件: {}", manifest_path.display()))?;

    let manifest = parse_manifest(&content)
        .with_context(|| format!("无法解析清单文件: {}", manifest_path.display()))?;

    Ok(manifest)
}

/// 把清单转换为描述任务列表
///
/// # 参数
/// - `manifest`: 已解析的清单
/// - `config`: 环境配置（清单未覆盖的字段取这里）
pub fn manifest_to_requests(
    manifest: &BatchManifest,
    config: &Config,
) -> AppResult<Vec<CaptionRequest>> {
    let style_id = manifest.style.as_deref().unwrap_or(&config.prompt_style);
    let style = preset::get(style_id)?;

    let prefix = manifest.prefix.as_deref().unwrap_or(&config.prefix);
    let suffix = manifest.suffix.as_deref().unwrap_or(&config.suffix);
    let max_chars = manifest.max_chars.or(config.max_chars);

    let mut requests = Vec::with_capacity(manifest.images.len());
    for image in &manifest.images {
        let (source, default_name) = match (&image.path, &image.url) {
            (Some(path), None) => (
                ImageSource::File(PathBuf::from(path)),
                file_stem_of(path),
            ),
            (None, Some(url)) => (ImageSource::Url(url.clone()), url_stem_of(url)),
            _ => {
                return Err(AppError::Other(
                    "清单中的每张图片必须恰好设置 path 或 url 之一".to_string(),
                ))
            }
        };

        let name = image.name.clone().unwrap_or(default_name);
        requests.push(CaptionRequest {
            name,
            image: source,
            system_message: style.system_message.to_string(),
            user_prompt: style.user_prompt.to_string(),
            postprocess: style.to_postprocess_config(
                prefix,
                suffix,
                max_chars,
                &manifest.negative_filters,
            ),
        });
    }

    Ok(requests)
}

/// 扫描图片目录，把每个受支持的图片文件变成一个描述任务
///
/// 文件按名称排序，保证批次顺序稳定。
pub async fn scan_image_folder(folder: &str, config: &Config) -> Result<Vec<CaptionRequest>> {
    let folder_path = PathBuf::from(folder);
    if !folder_path.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder.to_string(),
        })
        .into());
    }

    let style = preset::get(&config.prompt_style)?;

    let mut image_paths = Vec::new();
    let mut entries = fs::read_dir(&folder_path)
        .await
        .with_context(|| format!("无法读取图片目录: {}", folder))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            image_paths.push(path);
        }
    }
    image_paths.sort();

    let requests = image_paths
        .into_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            CaptionRequest {
                name,
                image: ImageSource::File(path),
                system_message: style.system_message.to_string(),
                user_prompt: style.user_prompt.to_string(),
                postprocess: style.to_postprocess_config(
                    &config.prefix,
                    &config.suffix,
                    config.max_chars,
                    &[],
                ),
            }
        })
        .collect();

    Ok(requests)
}

// ========== 辅助函数 ==========

/// 取文件路径的基础名
fn file_stem_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// 取 URL 的末段作为基础名
fn url_stem_of(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
        .to_string()
}
