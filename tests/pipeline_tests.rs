// Integration tests for the context pipeline
//
// Tests cover:
// - Compression ordering and budget behaviour over parsed records
// - Profile synthesis feeding the prompt
// - Guardian gating before text may be forwarded

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

use mindlens::classifier::SafetyClassifier;
use mindlens::config::config::{AnalysisConfig, CompressionConfig};
use mindlens::error::{AppError, Result};
use mindlens::models::{Event, EventKind, GuardianLevel, SafetyClassification, UserVault};
use mindlens::services::{
    AnalysisService, EMERGENCY_RESPONSE, EventCompressor, Guardian, INSUFFICIENT_PROFILE_DATA,
    build_analysis_prompt, estimate_tokens, synthesize_profile,
};
use mindlens::utils::deep_merge;

struct FixedClassifier(&'static str);

#[async_trait]
impl SafetyClassifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<SafetyClassification> {
        Ok(SafetyClassification::parse(self.0))
    }
}

struct FailingClassifier;

#[async_trait]
impl SafetyClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<SafetyClassification> {
        Err(AppError::Timeout("classifier did not answer".into()))
    }
}

fn record(kind: &str, day: u32, data: Value) -> Value {
    let timestamp = Utc.with_ymd_and_hms(2024, 5, day, 20, 0, 0).unwrap();
    json!({ "type": kind, "timestamp": timestamp, "data": data })
}

fn week_of_records() -> Vec<Value> {
    vec![
        record("text_session", 1, json!({"messages": ["merhaba", "bugün yorgunum"]})),
        record("diary_entry", 1, json!({"text": "İşte zor bir gündü."})),
        record("voice_session", 2, json!({"transcript": "biraz konuştuk"})),
        record("dream_analysis", 3, json!({"symbols": ["deniz"], "interpretation": "özgürlük"})),
        record("diary_entry", 4, json!({"text": "Annemle konuştum, iyi geldi."})),
        record("mood_check", 5, json!({"score": 4})),
        record("journey_log_entry", 6, json!({"mood": 6, "note": "yürüyüş"})),
        json!({"timestamp": "2024-05-07T20:00:00Z", "data": {"text": "no type"}}),
        record("video_session", 7, json!({"duration_min": 12})),
    ]
}

fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind.clone()).collect()
}

#[test]
fn test_full_history_fits_and_is_priority_ordered() {
    let events = Event::parse_batch(&week_of_records());
    assert_eq!(events.len(), 8);

    let compressed = EventCompressor::default().compress(&events, 7500);

    assert_eq!(
        kinds(&compressed.events),
        vec![
            EventKind::JourneyLogEntry,
            EventKind::DreamAnalysis,
            EventKind::DiaryEntry,
            EventKind::DiaryEntry,
            EventKind::TextSession,
            EventKind::VoiceSession,
            EventKind::VideoSession,
        ]
    );
    assert_eq!(compressed.events[2].data["text"], "İşte zor bir gündü.");
    assert_eq!(compressed.unrecognized, 1);
    assert_eq!(compressed.dropped, 0);
}

#[test]
fn test_tight_budget_keeps_highest_priority_prefix() {
    let events = Event::parse_batch(&week_of_records());
    let compressor = EventCompressor::default();
    let full = compressor.compress(&events, 7500);

    let first_two: usize = full.events[..2]
        .iter()
        .map(|e| estimate_tokens(&serde_json::to_string(e).unwrap()))
        .sum();

    let tight = compressor.compress(&events, first_two);

    assert_eq!(tight.events, full.events[..2].to_vec());
    assert_eq!(tight.estimated_tokens, first_two);
    assert_eq!(tight.dropped, 5);
}

#[test]
fn test_pipeline_prompt_is_reproducible() {
    let service = AnalysisService::new(&CompressionConfig::default(), &AnalysisConfig::default());
    let events = Event::parse_batch(&week_of_records());
    let vault: UserVault = serde_json::from_value(json!({
        "profile": {"nickname": "Ada"},
        "traits": {"confidence": 0.873, "anxiety_level": 0.41},
        "themes": ["iş", "aile"],
        "keyInsights": ["yürüyüş iyi geliyor", "pazartesi kaygısı", "uyku düzeni", "dördüncü"]
    }))
    .unwrap();

    let first = service.run(&events, &vault, service.defaults());
    let second = service.run(&events, &vault, service.defaults());

    assert_eq!(first.prompt, second.prompt);
    assert_eq!(
        first.profile,
        "İsim: Ada | Özgüven: 87% | Kaygı Seviyesi: 41% | Temalar: iş, aile \
         | Önemli İçgörüler: yürüyüş iyi geliyor, pazartesi kaygısı, uyku düzeni"
    );
    assert_eq!(
        first.prompt,
        build_analysis_prompt(7, &first.profile, &first.compressed.events)
    );
    assert!(first.prompt.contains("Son 7 Gün"));
}

#[test]
fn test_empty_vault_sentinel() {
    assert_eq!(synthesize_profile(&UserVault::default()), INSUFFICIENT_PROFILE_DATA);
}

#[test]
fn test_options_patch_is_deep_merged() {
    let service = AnalysisService::new(&CompressionConfig::default(), &AnalysisConfig::default());
    let options = service
        .resolve_options(Some(&json!({"token_budget": 100})))
        .unwrap();

    assert_eq!(options.days, 7);
    assert_eq!(options.token_budget, 100);

    assert_eq!(
        deep_merge(&json!({"a": 1, "b": {"c": 2, "d": 3}}), Some(&json!({"b": {"c": 99, "e": 5}, "f": 6}))),
        json!({"a": 1, "b": {"c": 99, "d": 3, "e": 5}, "f": 6})
    );
}

#[tokio::test]
async fn test_gate_before_model() {
    let safe = Guardian::new(Arc::new(FixedClassifier("level_0_safe")));
    let cleared = safe.admit("Bugün güzel bir gündü").await.unwrap();
    assert_eq!(cleared.level(), GuardianLevel::Safe);
    assert_eq!(cleared.into_inner(), "Bugün güzel bir gündü");

    let high = Guardian::new(Arc::new(FixedClassifier("level_3_high_alert")));
    let blocked = high.admit("I want to end it").await.unwrap_err();
    assert!(!blocked.is_safe_for_ai);
    assert_eq!(blocked.response.as_deref(), Some(EMERGENCY_RESPONSE));
}

#[tokio::test]
async fn test_fail_closed_paths_match_high_alert() {
    let high = Guardian::new(Arc::new(FixedClassifier("level_3_high_alert")))
        .assess_text_safety("metin")
        .await;
    let invalid = Guardian::new(Arc::new(FixedClassifier("not_a_level")))
        .assess_text_safety("metin")
        .await;
    let failing = Guardian::new(Arc::new(FailingClassifier))
        .assess_text_safety("metin")
        .await;

    assert_eq!(invalid, high);
    assert_eq!(failing, high);
}

#[tokio::test]
async fn test_mild_concern_passes_without_response() {
    let result = Guardian::new(Arc::new(FixedClassifier("level_1_mild_concern")))
        .assess_text_safety("biraz gerginim")
        .await;

    assert!(result.is_safe_for_ai);
    assert!(result.response.is_none());
    assert_eq!(result.level, GuardianLevel::SensitiveTopic);
}
