//! 用户事件数据模型
//!
//! 日记、情绪会话、梦境记录等用户活动事件。事件由调用方（存储/查询层）提供，
//! 本服务只读取，不修改。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// 事件类型
///
/// 变体按优先级声明，排在最前的分析价值最高。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// 结构化旅程日志
    JourneyLogEntry,
    /// 已分析的梦境
    DreamAnalysis,
    /// 日记
    DiaryEntry,
    /// 文字会话
    TextSession,
    /// 语音会话
    VoiceSession,
    /// 视频会话
    VideoSession,
    /// 未识别的类型，压缩时被丢弃
    Unknown(String),
}

impl EventKind {
    /// 已知类型，优先级从高到低
    pub const PRIORITY_ORDER: [EventKind; 6] = [
        EventKind::JourneyLogEntry,
        EventKind::DreamAnalysis,
        EventKind::DiaryEntry,
        EventKind::TextSession,
        EventKind::VoiceSession,
        EventKind::VideoSession,
    ];

    pub fn parse(tag: &str) -> Self {
        match tag {
            "journey_log_entry" => EventKind::JourneyLogEntry,
            "dream_analysis" => EventKind::DreamAnalysis,
            "diary_entry" => EventKind::DiaryEntry,
            "text_session" => EventKind::TextSession,
            "voice_session" => EventKind::VoiceSession,
            "video_session" => EventKind::VideoSession,
            other => EventKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::JourneyLogEntry => "journey_log_entry",
            EventKind::DreamAnalysis => "dream_analysis",
            EventKind::DiaryEntry => "diary_entry",
            EventKind::TextSession => "text_session",
            EventKind::VoiceSession => "voice_session",
            EventKind::VideoSession => "video_session",
            EventKind::Unknown(tag) => tag.as_str(),
        }
    }

    /// 优先级（0 为最高）；未知类型返回 `None`
    pub fn priority(&self) -> Option<usize> {
        match self {
            EventKind::JourneyLogEntry => Some(0),
            EventKind::DreamAnalysis => Some(1),
            EventKind::DiaryEntry => Some(2),
            EventKind::TextSession => Some(3),
            EventKind::VoiceSession => Some(4),
            EventKind::VideoSession => Some(5),
            EventKind::Unknown(_) => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(EventKind::parse(&tag))
    }
}

/// 用户事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// 事件类型
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// 发生时间，按调用方提供的原始形式保存（ISO 字符串或毫秒时间戳）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,

    /// 无模式负载，只要求可序列化
    pub data: Value,
}

impl Event {
    pub fn new(kind: EventKind, timestamp: DateTime<Utc>, data: Value) -> Self {
        Self {
            kind,
            timestamp: Some(Value::String(
                timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            data,
        }
    }

    /// 从无类型记录宽松转换
    ///
    /// `type` 不是字符串、`data` 缺失或为 null 时返回 `None`。
    /// 时间戳原样保留，不做解析或时区换算。
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let kind = EventKind::parse(object.get("type")?.as_str()?);
        let data = object.get("data").filter(|d| !d.is_null())?.clone();
        let timestamp = object.get("timestamp").cloned();

        Some(Self {
            kind,
            timestamp,
            data,
        })
    }

    /// 批量解析，静默跳过格式错误的记录
    pub fn parse_batch(values: &[Value]) -> Vec<Self> {
        let events: Vec<Self> = values.iter().filter_map(Self::from_value).collect();
        let malformed = values.len() - events.len();
        if malformed > 0 {
            tracing::debug!(malformed, "omitted malformed event records");
        }
        events
    }
}
