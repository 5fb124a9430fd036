//! 安全评估 DTO

use serde::Deserialize;

/// 文本安全评估请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssessTextRequest {
    /// 待评估的用户文本
    pub text: String,
}
