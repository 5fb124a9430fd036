//! JSON 值的结构化深度合并

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

/// 将 `patch` 合并到 `base` 上，返回新值
///
/// 两侧同一键都是对象时递归合并，其余情况（包括数组）
/// 整体替换为补丁值。
/// `None` 或 `null` 补丁不改变 `base`。
pub fn deep_merge(base: &Value, patch: Option<&Value>) -> Value {
    match patch {
        None | Some(Value::Null) => base.clone(),
        Some(patch) => merge_value(base, patch),
    }
}

/// [`deep_merge`] 的类型化版本：对可序列化结构打补丁
///
/// 合并结果无法反序列化为 `T` 时返回错误
pub fn merge_typed<T>(base: &T, patch: Option<&Value>) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let base = serde_json::to_value(base)?;
    Ok(serde_json::from_value(deep_merge(&base, patch))?)
}

fn merge_value(base: &Value, patch: &Value) -> Value {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            let mut merged = base_map.clone();
            for (key, patch_val) in patch_map {
                let value = match merged.get(key) {
                    Some(base_val) => merge_value(base_val, patch_val),
                    None => patch_val.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (_, patch) => patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_objects_merge() {
        let base = json!({"a": 1, "b": {"c": 2, "d": 3}});
        let patch = json!({"b": {"c": 99, "e": 5}, "f": 6});

        assert_eq!(
            deep_merge(&base, Some(&patch)),
            json!({"a": 1, "b": {"c": 99, "d": 3, "e": 5}, "f": 6})
        );
    }

    #[test]
    fn test_arrays_are_replaced() {
        let base = json!({"a": [1, 2]});
        let patch = json!({"a": [3]});

        assert_eq!(deep_merge(&base, Some(&patch)), json!({"a": [3]}));
    }

    #[test]
    fn test_missing_patch_returns_base() {
        let base = json!({"a": {"b": 1}});

        assert_eq!(deep_merge(&base, None), base);
        assert_eq!(deep_merge(&base, Some(&Value::Null)), base);
    }

    #[test]
    fn test_base_is_not_mutated() {
        let base = json!({"a": {"b": 1}});
        let snapshot = base.clone();

        let merged = deep_merge(&base, Some(&json!({"a": {"b": 2}})));

        assert_eq!(base, snapshot);
        assert_eq!(merged, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_type_mismatch_patch_wins() {
        let base = json!({"a": {"b": 1}, "c": 5});
        let patch = json!({"a": "flat", "c": {"d": 1}});

        assert_eq!(
            deep_merge(&base, Some(&patch)),
            json!({"a": "flat", "c": {"d": 1}})
        );
    }

    #[test]
    fn test_nested_null_overwrites() {
        let base = json!({"a": 1, "b": 2});
        assert_eq!(
            deep_merge(&base, Some(&json!({"a": null}))),
            json!({"a": null, "b": 2})
        );
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Options {
        days: u32,
        tags: Vec<String>,
    }

    #[test]
    fn test_merge_typed() {
        let base = Options {
            days: 7,
            tags: vec!["a".into(), "b".into()],
        };

        let merged = merge_typed(&base, Some(&json!({"tags": ["c"]}))).unwrap();
        assert_eq!(merged, Options { days: 7, tags: vec!["c".into()] });

        assert!(merge_typed(&base, Some(&json!({"days": "seven"}))).is_err());
    }

    #[test]
    fn test_non_object_root() {
        assert_eq!(deep_merge(&json!([1, 2]), Some(&json!({"a": 1}))), json!({"a": 1}));
        assert_eq!(deep_merge(&json!({"a": 1}), Some(&json!(7))), json!(7));
    }
}
