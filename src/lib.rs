//! Mindlens - 上下文压缩与安全守卫服务
//!
//! 将无上限的用户事件历史（日记、情绪会话、梦境记录）压缩为适合单次 LLM 调用的
//! token 受限上下文，合成用户画像并生成分析提示词；同时在文本到达模型之前
//! 对其进行危机/自伤风险分级。

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod utils;
