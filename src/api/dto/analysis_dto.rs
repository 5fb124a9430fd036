//! 分析 DTO
//!
//! 定义分析提示词相关的请求和响应数据结构。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 构建分析提示词请求
///
/// `events` 与 `vault` 保持无类型，格式错误的记录或字段逐个忽略，不会使整个请求失败。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildPromptRequest {
    /// 原始事件列表
    pub events: Vec<Value>,
    /// 用户画像库
    pub vault: Value,
    /// 报告天数，优先于 options.days
    pub days: Option<u32>,
    /// 对默认分析选项的补丁
    pub options: Option<Value>,
}

/// 构建分析提示词响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPromptResponse {
    /// 请求 ID
    pub request_id: String,
    /// 交给 LLM 的提示词
    pub prompt: String,
    /// 画像摘要
    pub profile: String,
    /// 报告天数
    pub days: u32,
    /// 纳入的事件数
    pub included_events: usize,
    /// 因预算被丢弃的事件数
    pub dropped_events: usize,
    /// 被忽略的格式错误或未知类型事件数
    pub ignored_events: usize,
    /// 估算 token 数
    pub estimated_tokens: usize,
    /// 使用的 token 预算
    pub token_budget: usize,
}
