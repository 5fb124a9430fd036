use crate::classifier::SafetyClassifier;
use crate::config::config::AppConfig;
use crate::observability::{AppMetrics, PipelineTelemetry};
use crate::services::analysis::AnalysisService;
use crate::services::guardian::Guardian;
use std::sync::Arc;

/// 应用状态，持有共享的无状态管道服务
#[derive(Clone)]
pub struct AppState {
    /// 压缩、画像与提示词管道
    pub analysis_service: Arc<AnalysisService>,
    /// 模型前的安全守卫
    pub guardian: Arc<Guardian>,
    /// /metrics 暴露的计数器
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("analysis_service", &self.analysis_service.defaults())
            .field("guardian", &"Arc<Guardian>")
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        config: &AppConfig,
        classifier: Box<dyn SafetyClassifier>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        let telemetry: Arc<dyn PipelineTelemetry> = metrics.clone();

        let analysis_service = AnalysisService::new(&config.compression, &config.analysis)
            .with_telemetry(telemetry.clone());
        let guardian = Guardian::new(Arc::from(classifier)).with_telemetry(telemetry);

        Self {
            analysis_service: Arc::new(analysis_service),
            guardian: Arc::new(guardian),
            metrics,
        }
    }
}
