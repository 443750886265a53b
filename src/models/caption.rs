//! 描述任务数据模型
//!
//! 批次中的每张图片对应一个 [`CaptionRequest`]，处理完成后产出一个
//! [`BatchItem`]。所有类型创建后不可变。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 图片来源
///
/// 图片要么是本地文件，要么是远程 URL。核心逻辑不关心具体传输方式，
/// 由 `infrastructure::ImageFetcher` 转换为视觉模型可接受的 URL。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// 本地图片文件
    File(PathBuf),
    /// 远程图片 URL
    Url(String),
}

/// 后处理参数
///
/// 附加在请求上的值对象，创建后不再修改。
/// 不变量：`max_chars` 若存在则必须大于 0（由加载层校验）；
/// `negative_filters` 中的短语按列表顺序、大小写不敏感地整词匹配。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostProcessConfig {
    /// 前缀（可选），以 ", " 连接到正文前
    pub prefix: Option<String>,
    /// 后缀（可选），以 ", " 连接到正文后
    pub suffix: Option<String>,
    /// 最大字符数（可选）
    pub max_chars: Option<usize>,
    /// 需要删除的短语列表（可为空）
    #[serde(default)]
    pub negative_filters: Vec<String>,
}

/// 一个描述任务：一张图片 + 提示词 + 后处理参数
///
/// 在批次提交时逐图构建，由编排层消费一次。
#[derive(Debug, Clone)]
pub struct CaptionRequest {
    /// 标识名称，用于推导输出文件名
    pub name: String,
    /// 图片载荷
    pub image: ImageSource,
    /// 系统指令
    pub system_message: String,
    /// 用户指令
    pub user_prompt: String,
    /// 后处理参数
    pub postprocess: PostProcessConfig,
}

impl CaptionRequest {
    /// 推导输出文件名：`<基础名>.txt`
    ///
    /// 无论成功还是失败都用同一规则，保证错误条目也能对回原始图片。
    pub fn output_file_name(&self) -> String {
        let stem = Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone());
        format!("{}.txt", stem)
    }
}

/// 单张图片的处理结果
///
/// 单项失败以数据形式记录（而不是错误向上传播），
/// 这样一张坏图不会中断整个批次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum CaptionOutcome {
    /// 后处理完成的最终描述文本
    Caption(String),
    /// 生成失败，保留可读的错误信息
    Failed(String),
}

impl CaptionOutcome {
    /// 是否成功
    pub fn is_caption(&self) -> bool {
        matches!(self, CaptionOutcome::Caption(_))
    }
}

/// 批次结果中的一项：(输出文件名, 结果)
///
/// 由编排层按提交顺序逐个产出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    /// 输出文件名（`<基础名>.txt`）
    pub file_name: String,
    /// 处理结果
    pub outcome: CaptionOutcome,
}
