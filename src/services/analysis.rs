//! 分析管道服务
//!
//! 为单个请求执行上下文管道：
//! - 将事件历史压缩进 token 预算
//! - 由画像库合成画像摘要
//! - 为 LLM 调用方生成分析提示词
//!
//! 调用之间无状态，单个实例可服务并发请求。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::config::config::{AnalysisConfig, CompressionConfig};
use crate::error::{AppError, Result};
use crate::models::event::Event;
use crate::models::vault::UserVault;
use crate::observability::PipelineTelemetry;
use crate::services::compression::{CompressedEventSet, EventCompressor};
use crate::services::profile_synthesizer::synthesize_profile;
use crate::services::prompt_builder::build_analysis_prompt;
use crate::services::token_estimator::TokenEstimator;
use crate::utils::merge_typed;

/// 单次请求参数，可通过 [`AnalysisService::resolve_options`] 打补丁
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// 报告天数
    pub days: u32,
    pub token_budget: usize,
}

/// 分析管道输出
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub prompt: String,
    pub profile: String,
    pub compressed: CompressedEventSet,
    pub options: AnalysisOptions,
}

#[derive(Clone)]
pub struct AnalysisService {
    compressor: EventCompressor,
    defaults: AnalysisOptions,
    max_days: u32,
}

impl AnalysisService {
    pub fn new(compression: &CompressionConfig, analysis: &AnalysisConfig) -> Self {
        Self {
            compressor: EventCompressor::new(TokenEstimator::new(compression.chars_per_token)),
            defaults: AnalysisOptions {
                days: analysis.default_days,
                token_budget: compression.token_budget,
            },
            max_days: analysis.max_days,
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn PipelineTelemetry>) -> Self {
        self.compressor = self.compressor.with_telemetry(telemetry);
        self
    }

    pub fn defaults(&self) -> AnalysisOptions {
        self.defaults
    }

    /// 将请求的 `options` 补丁深度合并到配置默认值上
    pub fn resolve_options(&self, patch: Option<&Value>) -> Result<AnalysisOptions> {
        let options: AnalysisOptions = merge_typed(&self.defaults, patch)
            .map_err(|e| AppError::Validation(format!("invalid analysis options: {}", e)))?;

        if options.days == 0 || options.days > self.max_days {
            return Err(AppError::Validation(format!(
                "days must be between 1 and {}, got {}",
                self.max_days, options.days
            )));
        }
        if options.token_budget == 0 {
            return Err(AppError::Validation(
                "token_budget must be greater than 0".to_string(),
            ));
        }
        Ok(options)
    }

    /// 压缩先于提示词构建完成，
    /// 提示词只看到压缩后的事件集。
    pub fn run(&self, events: &[Event], vault: &UserVault, options: AnalysisOptions) -> AnalysisOutcome {
        let compressed = self.compressor.compress(events, options.token_budget);
        let profile = synthesize_profile(vault);
        let prompt = build_analysis_prompt(options.days, &profile, &compressed.events);

        tracing::info!(
            days = options.days,
            input_events = events.len(),
            included_events = compressed.len(),
            dropped_events = compressed.dropped,
            estimated_tokens = compressed.estimated_tokens,
            "analysis prompt built"
        );

        AnalysisOutcome {
            prompt,
            profile,
            compressed,
            options,
        }
    }
}
