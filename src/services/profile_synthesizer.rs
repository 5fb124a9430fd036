//! 画像合成
//!
//! 将用户画像库归纳为嵌入分析提示词的简短描述。
//! 缺失字段直接跳过，从不报错。

use crate::models::vault::UserVault;

/// 画像库没有任何字段时返回
pub const INSUFFICIENT_PROFILE_DATA: &str = "Yeterli profil verisi yok.";

const FRAGMENT_SEPARATOR: &str = " | ";
const MAX_KEY_INSIGHTS: usize = 3;

/// `round(x * 100)` 取整百分比
fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn synthesize_profile(vault: &UserVault) -> String {
    let mut fragments: Vec<String> = Vec::new();

    if let Some(nickname) = non_blank(vault.nickname()) {
        fragments.push(format!("İsim: {}", nickname));
    }

    if let Some(traits) = &vault.traits {
        if let Some(confidence) = traits.confidence.filter(|c| c.is_finite()) {
            fragments.push(format!("Özgüven: {}%", percent(confidence)));
        }
        if let Some(anxiety) = traits.anxiety_level.filter(|a| a.is_finite()) {
            fragments.push(format!("Kaygı Seviyesi: {}%", percent(anxiety)));
        }
        if let Some(style) = non_blank(traits.writing_style.as_deref()) {
            fragments.push(format!("Yazım Tarzı: {}", style));
        }
    }

    if let Some(themes) = vault.themes.as_ref().filter(|t| !t.is_empty()) {
        fragments.push(format!("Temalar: {}", themes.join(", ")));
    }

    if let Some(insights) = vault.key_insights.as_ref().filter(|i| !i.is_empty()) {
        let first: Vec<&str> = insights
            .iter()
            .take(MAX_KEY_INSIGHTS)
            .map(String::as_str)
            .collect();
        fragments.push(format!("Önemli İçgörüler: {}", first.join(", ")));
    }

    if fragments.is_empty() {
        return INSUFFICIENT_PROFILE_DATA.to_string();
    }
    fragments.join(FRAGMENT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vault(value: serde_json::Value) -> UserVault {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_vault_returns_sentinel() {
        assert_eq!(synthesize_profile(&UserVault::default()), INSUFFICIENT_PROFILE_DATA);
        assert_eq!(
            synthesize_profile(&vault(json!({"profile": {}, "traits": {}, "themes": []}))),
            INSUFFICIENT_PROFILE_DATA
        );
    }

    #[test]
    fn test_nickname_and_rounded_confidence() {
        let summary = synthesize_profile(&vault(json!({
            "profile": {"nickname": "Ada"},
            "traits": {"confidence": 0.873}
        })));

        assert!(summary.contains("İsim: Ada"));
        assert!(summary.contains("87%"));
        assert!(!summary.contains("87.3"));
        assert_eq!(summary, "İsim: Ada | Özgüven: 87%");
    }

    #[test]
    fn test_rounds_to_nearest_not_truncates() {
        let summary = synthesize_profile(&vault(json!({"traits": {"anxiety_level": 0.456}})));
        assert_eq!(summary, "Kaygı Seviyesi: 46%");
    }

    #[test]
    fn test_zero_valued_traits_are_present() {
        let summary = synthesize_profile(&vault(json!({"traits": {"confidence": 0.0}})));
        assert_eq!(summary, "Özgüven: 0%");
    }

    #[test]
    fn test_full_vault_fragment_order() {
        let summary = synthesize_profile(&vault(json!({
            "profile": {"nickname": "Deniz"},
            "traits": {"confidence": 0.6, "anxiety_level": 0.35, "writing_style": "içe dönük"},
            "themes": ["iş stresi", "aile"],
            "keyInsights": ["a", "b", "c", "d"]
        })));

        assert_eq!(
            summary,
            "İsim: Deniz | Özgüven: 60% | Kaygı Seviyesi: 35% | Yazım Tarzı: içe dönük \
             | Temalar: iş stresi, aile | Önemli İçgörüler: a, b, c"
        );
    }

    #[test]
    fn test_blank_strings_are_absent() {
        let summary = synthesize_profile(&vault(json!({
            "profile": {"nickname": "  "},
            "traits": {"writing_style": ""},
            "keyInsights": ["tek"]
        })));
        assert_eq!(summary, "Önemli İçgörüler: tek");
    }
}
