//! Token 估算

/// 日记语言的每 token 字符数。土耳其语单词长且后缀多，
/// 因此低于常见的英语比例。
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 3.5;

/// 启发式 token 估算：`ceil(chars / chars_per_token)`
///
/// 不是分词器；结果随文本长度单调且确定。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenEstimator {
    chars_per_token: f64,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN)
    }
}

impl TokenEstimator {
    /// 非有限或非正的比例回退到默认值
    pub fn new(chars_per_token: f64) -> Self {
        let chars_per_token = if chars_per_token.is_finite() && chars_per_token > 0.0 {
            chars_per_token
        } else {
            DEFAULT_CHARS_PER_TOKEN
        };
        Self { chars_per_token }
    }

    pub fn chars_per_token(&self) -> f64 {
        self.chars_per_token
    }

    pub fn estimate(&self, text: &str) -> usize {
        let chars = text.chars().count();
        if chars == 0 {
            return 0;
        }
        (chars as f64 / self.chars_per_token).ceil() as usize
    }
}

/// 使用默认比例估算
pub fn estimate_tokens(text: &str) -> usize {
    TokenEstimator::default().estimate(text)
}
