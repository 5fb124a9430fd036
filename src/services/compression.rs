//! 事件压缩服务
//!
//! 将无上限的事件历史按优先级装入固定的 token 预算。

use std::sync::Arc;

use crate::models::event::Event;
use crate::observability::{PipelineTelemetry, TracingTelemetry};
use crate::services::token_estimator::TokenEstimator;

/// 默认 token 预算
pub const DEFAULT_TOKEN_BUDGET: usize = 7500;

/// 预算截断装箱时发出的诊断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationReport {
    /// 被排除的已排序事件数
    pub dropped: usize,
    /// 纳入的事件数
    pub kept: usize,
    pub budget: usize,
    pub used_tokens: usize,
}

/// 压缩结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressedEventSet {
    /// 纳入的事件，先按优先级类别再按输入顺序
    pub events: Vec<Event>,
    /// 各事件估算之和，不超过预算
    pub estimated_tokens: usize,
    /// 因预算被截掉的已知类型事件数
    pub dropped: usize,
    /// 因类型未知被排除的事件数
    pub unrecognized: usize,
}

impl CompressedEventSet {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

/// 按优先级贪心装箱
///
/// 遇到第一个会超出预算的事件即停止装箱，
/// 即使后面的事件足够小也不再尝试。
#[derive(Clone)]
pub struct EventCompressor {
    estimator: TokenEstimator,
    telemetry: Arc<dyn PipelineTelemetry>,
}

impl Default for EventCompressor {
    fn default() -> Self {
        Self::new(TokenEstimator::default())
    }
}

impl EventCompressor {
    pub fn new(estimator: TokenEstimator) -> Self {
        Self {
            estimator,
            telemetry: Arc::new(TracingTelemetry),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn PipelineTelemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    /// 整个事件序列化后的 token 成本（含字段名）
    ///
    /// 无法序列化时返回 `None`。
    pub fn event_cost(&self, event: &Event) -> Option<usize> {
        serde_json::to_string(event)
            .ok()
            .map(|json| self.estimator.estimate(&json))
    }

    pub fn compress(&self, events: &[Event], budget: usize) -> CompressedEventSet {
        let mut ranked: Vec<(usize, &Event)> = events
            .iter()
            .filter_map(|event| event.kind.priority().map(|p| (p, event)))
            .collect();
        let unrecognized = events.len() - ranked.len();
        if unrecognized > 0 {
            tracing::debug!(unrecognized, "excluded events with unknown kind");
        }

        // stable: input order survives within a class
        ranked.sort_by_key(|(priority, _)| *priority);

        let mut included = Vec::new();
        let mut used_tokens = 0usize;

        for (_, event) in &ranked {
            // an unpriceable event ends packing like an overflow
            let Some(cost) = self.event_cost(event) else {
                tracing::warn!(kind = %event.kind, "stopped packing at unserializable event");
                break;
            };
            if used_tokens + cost > budget {
                break;
            }
            used_tokens += cost;
            included.push((*event).clone());
        }

        let dropped = ranked.len() - included.len();
        if dropped > 0 {
            self.telemetry.events_dropped(&TruncationReport {
                dropped,
                kept: included.len(),
                budget,
                used_tokens,
            });
        }

        CompressedEventSet {
            events: included,
            estimated_tokens: used_tokens,
            dropped,
            unrecognized,
        }
    }
}
