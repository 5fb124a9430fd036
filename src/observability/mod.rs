//! 可观测性模块
//!
//! 提供管道遥测接口、Prometheus 指标、结构化日志和健康检查。

use axum::{Json, Router, response::IntoResponse, routing::get};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::config::LoggingConfig;
use crate::error::{AppError, Result};
use crate::models::safety::GuardianLevel;
use crate::services::compression::TruncationReport;

// ===== Pipeline Telemetry =====

/// 可注入的管道诊断接收端
pub trait PipelineTelemetry: Send + Sync {
    /// 压缩时发生预算截断
    fn events_dropped(&self, report: &TruncationReport);

    /// 守卫根据分类器得出判定
    fn guardian_verdict(&self, level: GuardianLevel);
}

/// 只写日志的遥测实现
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl PipelineTelemetry for TracingTelemetry {
    fn events_dropped(&self, report: &TruncationReport) {
        tracing::warn!(
            dropped = report.dropped,
            kept = report.kept,
            budget = report.budget,
            used_tokens = report.used_tokens,
            "token budget reached, dropped {} events",
            report.dropped
        );
    }

    fn guardian_verdict(&self, level: GuardianLevel) {
        match level {
            GuardianLevel::CriticalAlert => {
                tracing::warn!(level = level.as_str(), "guardian blocked text")
            }
            _ => tracing::debug!(level = level.as_str(), "guardian verdict"),
        }
    }
}

// ===== Simple Metrics =====

/// 应用指标
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub http_request_duration_sum: Arc<AtomicU64>,
    pub prompts_built_total: Arc<AtomicU64>,
    pub truncations_total: Arc<AtomicU64>,
    pub events_dropped_total: Arc<AtomicU64>,
    pub guardian_safe_total: Arc<AtomicU64>,
    pub guardian_sensitive_total: Arc<AtomicU64>,
    pub guardian_blocked_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// 记录生成的分析提示词
    pub fn record_prompt_built(&self) {
        self.prompts_built_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录错误
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP analysis_prompts_built_total Analysis prompts built
# TYPE analysis_prompts_built_total counter
analysis_prompts_built_total {}
# HELP compression_truncations_total Compressions cut short by the token budget
# TYPE compression_truncations_total counter
compression_truncations_total {}
# HELP compression_events_dropped_total Events dropped by the token budget
# TYPE compression_events_dropped_total counter
compression_events_dropped_total {}
# HELP guardian_verdicts_total Guardian verdicts by level
# TYPE guardian_verdicts_total counter
guardian_verdicts_total{{level="safe"}} {}
guardian_verdicts_total{{level="sensitive_topic"}} {}
guardian_verdicts_total{{level="critical_alert"}} {}
# HELP errors_total Total errors
# TYPE errors_total counter
errors_total {}
"#,
            self.http_requests_total.load(Ordering::SeqCst),
            self.http_request_duration_sum.load(Ordering::SeqCst) as f64 / 1000.0,
            self.http_requests_total.load(Ordering::SeqCst),
            self.prompts_built_total.load(Ordering::SeqCst),
            self.truncations_total.load(Ordering::SeqCst),
            self.events_dropped_total.load(Ordering::SeqCst),
            self.guardian_safe_total.load(Ordering::SeqCst),
            self.guardian_sensitive_total.load(Ordering::SeqCst),
            self.guardian_blocked_total.load(Ordering::SeqCst),
            self.errors_total.load(Ordering::SeqCst),
        )
    }
}

impl PipelineTelemetry for AppMetrics {
    fn events_dropped(&self, report: &TruncationReport) {
        self.truncations_total.fetch_add(1, Ordering::SeqCst);
        self.events_dropped_total
            .fetch_add(report.dropped as u64, Ordering::SeqCst);
        TracingTelemetry.events_dropped(report);
    }

    fn guardian_verdict(&self, level: GuardianLevel) {
        let counter = match level {
            GuardianLevel::Safe => &self.guardian_safe_total,
            GuardianLevel::SensitiveTopic => &self.guardian_sensitive_total,
            GuardianLevel::CriticalAlert => &self.guardian_blocked_total,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        TracingTelemetry.guardian_verdict(level);
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
}

/// 可观测性状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String, metrics: Arc<AppMetrics>) -> Self {
        Self {
            metrics,
            start_time: Utc::now(),
            version,
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }
}

/// 获取完整健康状态
pub async fn health_check(
    state: axum::extract::State<Arc<ObservabilityState>>,
) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查。管道无外部依赖需要预热，进程存活即就绪
pub async fn readiness() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "Ready")
}

/// Prometheus 指标端点
pub async fn metrics(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let output = state.metrics.gather();
    (axum::http::StatusCode::OK, output)
}

/// 版本信息端点
pub async fn version(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化结构化日志
///
/// `RUST_LOG` 优先于 `config.level`。设置 `log_dir` 时日志同时写入按天滚动的文件，
/// 返回的 guard 须在进程生命周期内保持存活。
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let default_level = if config.level.is_empty() {
        "info"
    } else {
        config.level.as_str()
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},{}={}", default_level, service_name, default_level)));

    let (file_writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, format!("{}.log", service_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
    });

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    let init_result = if config.structured {
        registry
            .with(fmt::layer().json().with_target(true).with_line_number(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };

    init_result.map_err(|e| AppError::Internal(format!("Failed to set tracing subscriber: {}", e)))?;
    Ok(guard)
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    axum::extract::State(metrics): axum::extract::State<Arc<AppMetrics>>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    metrics.record_http_request(duration_ms);
    if response.status().is_server_error() {
        metrics.record_error();
    }

    response
}
