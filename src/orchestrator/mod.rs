//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_runner` - 批次执行器
//! - 把任务列表变成惰性的、按提交顺序产出的结果流
//! - 严格串行，单项失败不中断，消费方丢弃流即取消
//!
//! ### `batch_processor` - 应用主体
//! - 管理应用生命周期（初始化、运行）
//! - 装配批次（清单文件 / 目录扫描）
//! - 消费结果流并落盘，输出全局统计
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (装配 Vec<CaptionRequest>，消费结果流)
//!     ↓
//! batch_runner (逐项驱动，保证顺序)
//!     ↓
//! workflow::CaptionFlow (处理单张图片)
//!     ↓
//! services (能力层：vision / post_processor / writer)
//!     ↓
//! infrastructure (基础设施：ImageFetcher)
//! ```

pub mod batch_processor;
pub mod batch_runner;

// 重新导出主要类型
pub use batch_processor::App;
pub use batch_runner::stream_batch;
