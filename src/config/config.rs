use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::services::compression::DEFAULT_TOKEN_BUDGET;
use crate::services::token_estimator::DEFAULT_CHARS_PER_TOKEN;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            request_timeout: 30,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
            log_dir: None,
        }
    }
}

/// 事件压缩配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// 单次分析的 token 预算
    pub token_budget: usize,
    /// 每个 token 对应的字符数
    pub chars_per_token: f64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            token_budget: DEFAULT_TOKEN_BUDGET,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

/// 分析报告配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 默认报告天数
    pub default_days: u32,
    /// 允许的最大天数
    pub max_days: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_days: 7,
            max_days: 365,
        }
    }
}

/// 安全分类器后端
///
/// 未知的后端名称在加载配置时即被拒绝，不会回退到其他后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// 远程 Ollama 安全模型
    Ollama,
    /// 本地关键词列表，仅用于开发
    Keyword,
}

impl ClassifierBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierBackend::Ollama => "ollama",
            ClassifierBackend::Keyword => "keyword",
        }
    }
}

impl fmt::Display for ClassifierBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 安全守卫配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardianConfig {
    /// 分类器后端
    pub backend: ClassifierBackend,
    /// Ollama 服务器地址
    pub ollama_url: String,
    /// 分类模型名称
    pub model_name: String,
    /// 分类请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Keyword,
            ollama_url: "http://localhost:11434".into(),
            model_name: "llama-guard3".into(),
            timeout_secs: 15,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 事件压缩配置
    pub compression: CompressionConfig,
    /// 分析报告配置
    pub analysis: AnalysisConfig,
    /// 安全守卫配置
    pub guardian: GuardianConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig {
                level: "debug".into(),
                ..LoggingConfig::default()
            },
            compression: CompressionConfig::default(),
            analysis: AnalysisConfig::default(),
            guardian: GuardianConfig::default(),
            app_name: "mindlens".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.logging.log_dir = Some(PathBuf::from("./logs"));
        config.guardian.backend = ClassifierBackend::Ollama;
        config
    }
}
