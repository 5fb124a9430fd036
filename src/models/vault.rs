//! 用户画像库（Vault）数据模型
//!
//! 只读快照：管道从不回写。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 用户画像库
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserVault {
    /// 基本资料
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<VaultProfile>,

    /// 心理特征
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<VaultTraits>,

    /// 反复出现的主题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,

    /// 关键洞察
    #[serde(rename = "keyInsights", skip_serializing_if = "Option::is_none")]
    pub key_insights: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// 心理特征
///
/// `confidence` 与 `anxiety_level` 为 `0.0..=1.0` 的比例值；
/// 未识别的特征键原样保存在 `extra` 中。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultTraits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anxiety_level: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_style: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const KNOWN_TRAITS: [&str; 3] = ["confidence", "anxiety_level", "writing_style"];

impl UserVault {
    /// 从无类型 JSON 宽松解析
    ///
    /// 类型不符的字段按缺失处理，列表中的非字符串元素被跳过。
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            profile: object
                .get("profile")
                .and_then(Value::as_object)
                .map(|profile| VaultProfile {
                    nickname: string_field(profile, "nickname"),
                }),
            traits: object
                .get("traits")
                .and_then(Value::as_object)
                .map(VaultTraits::from_object),
            themes: string_list(object.get("themes")),
            key_insights: string_list(object.get("keyInsights")),
        }
    }

    pub fn nickname(&self) -> Option<&str> {
        self.profile.as_ref()?.nickname.as_deref()
    }
}

impl VaultTraits {
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            confidence: object.get("confidence").and_then(Value::as_f64),
            anxiety_level: object.get("anxiety_level").and_then(Value::as_f64),
            writing_style: string_field(object, "writing_style"),
            extra: object
                .iter()
                .filter(|(key, _)| !KNOWN_TRAITS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
    )
}
