//! 图片载荷获取 - 基础设施层
//!
//! 唯一持有 HTTP 客户端的模块，只暴露"把图片来源变成模型可用 URL"的能力。

use crate::models::caption::ImageSource;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// 图片载荷错误
#[derive(Debug, Error)]
pub enum ImagePayloadError {
    /// 不支持的图片格式
    #[error("不支持的图片格式: {0}")]
    UnsupportedFormat(String),
    /// 读取本地图片失败
    #[error("读取图片文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 下载远程图片失败
    #[error("下载图片失败 ({url}): {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 远程图片返回错误状态
    #[error("图片下载返回错误状态 ({url}): {status}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// 图片获取器
///
/// 持有 `reqwest::Client`（连接池是稀缺资源，整个应用共用一个）。
pub struct ImageFetcher {
    http: reqwest::Client,
}

impl ImageFetcher {
    /// 创建新的图片获取器
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// 把图片来源转换为视觉模型可接受的 URL
    ///
    /// # 参数
    /// - `source`: 本地文件或远程 URL
    /// - `inline_remote`: 为 true 时把远程图片下载后内联为 data URL
    ///   （本地推理服务通常无法自己访问外网 URL）
    ///
    /// # 返回
    /// 远程 URL 原样透传（除非要求内联），本地文件读出后编码为
    /// `data:<mime>;base64,...`
    pub async fn to_image_url(
        &self,
        source: &ImageSource,
        inline_remote: bool,
    ) -> Result<String, ImagePayloadError> {
        match source {
            ImageSource::Url(url) => {
                if !inline_remote {
                    return Ok(url.clone());
                }
                debug!("内联远程图片: {}", url);
                let response = self.http.get(url).send().await.map_err(|e| {
                    ImagePayloadError::FetchFailed {
                        url: url.clone(),
                        source: e,
                    }
                })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ImagePayloadError::BadStatus {
                        url: url.clone(),
                        status,
                    });
                }
                let mime = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("image/jpeg")
                    .to_string();
                let bytes =
                    response
                        .bytes()
                        .await
                        .map_err(|e| ImagePayloadError::FetchFailed {
                            url: url.clone(),
                            source: e,
                        })?;
                Ok(to_data_url(&mime, &bytes))
            }
            ImageSource::File(path) => {
                let mime = mime_from_extension(path)?;
                debug!("读取本地图片: {} ({})", path.display(), mime);
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    ImagePayloadError::ReadFailed {
                        path: path.display().to_string(),
                        source: e,
                    }
                })?;
                Ok(to_data_url(mime, &bytes))
            }
        }
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// 编码为 data URL
fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// 从文件扩展名推断 MIME 类型
fn mime_from_extension(path: &Path) -> Result<&'static str, ImagePayloadError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        "bmp" => Ok("image/bmp"),
        other => Err(ImagePayloadError::UnsupportedFormat(other.to_string())),
    }
}

/// 判断路径是否是受支持的图片文件
pub fn is_supported_image(path: &Path) -> bool {
    mime_from_extension(path).is_ok()
}
