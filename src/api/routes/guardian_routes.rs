//! 安全守卫路由
//!
//! 定义文本安全评估相关的 API 路由。

use crate::api::handlers::guardian_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建安全评估路由器
pub fn create_guardian_router() -> Router<AppState> {
    Router::new().route("/guardian/assess", post(assess_text))
}
