use crate::config::config::{AppConfig, ClassifierBackend};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "MINDLENS_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（低到高）：
    /// 1. 内置开发环境默认值
    /// 2. ./mindlens.toml
    /// 3. `MINDLENS_` 前缀环境变量，嵌套字段以 `__` 分隔
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.compression.token_budget == 0 {
            return Err(ConfigValidationError::InvalidTokenBudget);
        }

        let ratio = config.compression.chars_per_token;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigValidationError::InvalidCharsPerToken(ratio));
        }

        if config.analysis.default_days == 0 || config.analysis.default_days > config.analysis.max_days {
            return Err(ConfigValidationError::InvalidDays {
                default_days: config.analysis.default_days,
                max_days: config.analysis.max_days,
            });
        }

        if config.guardian.backend == ClassifierBackend::Ollama && config.guardian.ollama_url.is_empty() {
            return Err(ConfigValidationError::MissingClassifierUrl);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("token 预算无效，必须大于 0")]
    InvalidTokenBudget,

    #[error("每 token 字符数无效: {0}")]
    InvalidCharsPerToken(f64),

    #[error("报告天数无效: default_days={default_days}, max_days={max_days}")]
    InvalidDays { default_days: u32, max_days: u32 },

    #[error("Ollama 分类器地址未配置")]
    MissingClassifierUrl,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("mindlens.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.compression.token_budget, 7500);
            assert_eq!(config.compression.chars_per_token, 3.5);
            assert_eq!(config.analysis.default_days, 7);
            assert_eq!(config.guardian.backend, ClassifierBackend::Keyword);
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "mindlens.toml",
                r#"
                    app_name = "mindlens-test"

                    [compression]
                    token_budget = 4000

                    [guardian]
                    backend = "ollama"
                "#,
            )?;
            jail.set_env("MINDLENS_COMPRESSION__TOKEN_BUDGET", "2000");
            jail.set_env("MINDLENS_SERVER__PORT", "9090");

            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.app_name, "mindlens-test");
            assert_eq!(config.compression.token_budget, 2000);
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.guardian.backend, ClassifierBackend::Ollama);
            assert_eq!(config.guardian.model_name, "llama-guard3");
            Ok(())
        });
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("MINDLENS_GUARDIAN__BACKEND", "olama");
            assert!(ConfigLoader::load().is_err());
            Ok(())
        });

        Jail::expect_with(|jail| {
            jail.create_file(
                "mindlens.toml",
                r#"
                    [guardian]
                    backend = "Keyword-list"
                "#,
            )?;
            assert!(ConfigLoader::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_validate() {
        assert!(ConfigLoader::validate(&AppConfig::development()).is_ok());
        assert!(ConfigLoader::validate(&AppConfig::production()).is_ok());

        let mut config = AppConfig::development();
        config.server.port = 0;
        assert_eq!(ConfigLoader::validate(&config), Err(ConfigValidationError::InvalidPort));

        let mut config = AppConfig::development();
        config.compression.token_budget = 0;
        assert_eq!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidTokenBudget)
        );

        let mut config = AppConfig::development();
        config.analysis.default_days = 400;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidDays { .. })
        ));

        let mut config = AppConfig::development();
        config.guardian.backend = ClassifierBackend::Ollama;
        config.guardian.ollama_url.clear();
        assert_eq!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::MissingClassifierUrl)
        );
    }
}
