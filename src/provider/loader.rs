//! 从进程环境变量引导创建 ConfigProvider

use std::env;

use super::{BackendConfig, ConfigProvider, ProviderError, SOURCE_SECRETS_MANAGER};

/// 部署环境名
pub const ENV_ENVIRONMENT: &str = "HMD_ENVIRONMENT";
/// 后端名称，未设置时使用 `secrets_manager`
pub const ENV_CONFIG_PROVIDER: &str = "CONFIG_PROVIDER";
/// 预加载的 dotenv 文件路径
pub const ENV_CONFIG_FILE: &str = "CFG";
pub const ENV_AWS_REGION: &str = "AWS_REGION";

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl ConfigProvider {
    /// 根据环境变量选择并创建后端
    ///
    /// 1. 若设置了 `CFG`，先将该 dotenv 文件加载到进程环境（失败只记日志）
    /// 2. `HMD_ENVIRONMENT` 必填
    /// 3. `CONFIG_PROVIDER` 选择后端，默认 `secrets_manager`
    /// 4. `AWS_REGION` 作为区域
    pub fn from_env(default_service_name: &str) -> Result<Self, ProviderError> {
        if let Some(path) = non_empty_var(ENV_CONFIG_FILE) {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path, error = %e, "failed to load config file");
            }
        }

        let environment = non_empty_var(ENV_ENVIRONMENT).ok_or(ProviderError::EnvNotSet(ENV_ENVIRONMENT))?;
        let source = non_empty_var(ENV_CONFIG_PROVIDER).unwrap_or_else(|| SOURCE_SECRETS_MANAGER.to_string());
        let region = non_empty_var(ENV_AWS_REGION).unwrap_or_default();

        Self::new(
            &source,
            &BackendConfig::new(environment, default_service_name, region),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use serial_test::serial;
    use std::io::Write;

    fn clear() {
        for name in [ENV_ENVIRONMENT, ENV_CONFIG_PROVIDER, ENV_CONFIG_FILE, ENV_AWS_REGION] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_environment() {
        clear();
        assert!(matches!(
            ConfigProvider::from_env("svc"),
            Err(ProviderError::EnvNotSet(ENV_ENVIRONMENT))
        ));

        env::set_var(ENV_ENVIRONMENT, "");
        assert!(ConfigProvider::from_env("svc").is_err());
        clear();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_to_secrets_manager() {
        clear();
        env::set_var(ENV_ENVIRONMENT, "staging");
        env::set_var(ENV_AWS_REGION, "eu-west-1");
        let p = ConfigProvider::from_env("svc").unwrap();
        assert_eq!(p.name(), "secrets_manager");

        // 缺少区域时 secrets_manager 构造失败
        env::remove_var(ENV_AWS_REGION);
        assert!(matches!(
            ConfigProvider::from_env("svc"),
            Err(ProviderError::InvalidConfig(_))
        ));
        clear();
    }

    #[test]
    #[serial]
    fn test_from_env_selects_provider() {
        clear();
        env::set_var(ENV_ENVIRONMENT, "dev");
        env::set_var(ENV_CONFIG_PROVIDER, "parameter_store");
        assert_eq!(ConfigProvider::from_env("svc").unwrap().name(), "parameter_store");

        env::set_var(ENV_CONFIG_PROVIDER, "etcd");
        assert!(matches!(
            ConfigProvider::from_env("svc"),
            Err(ProviderError::UnsupportedBackend(_))
        ));
        clear();
    }

    #[test]
    #[serial]
    fn test_from_env_loads_config_file() {
        clear();
        env::remove_var("AWSCFG_FROM_FILE");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "HMD_ENVIRONMENT=local").unwrap();
        writeln!(file, "CONFIG_PROVIDER=env").unwrap();
        writeln!(file, "AWSCFG_FROM_FILE=42").unwrap();
        env::set_var(ENV_CONFIG_FILE, file.path());

        let p = ConfigProvider::from_env("svc").unwrap();
        assert_eq!(p.name(), "env");
        assert_eq!(p.must_get_int("AWSCFG_FROM_FILE"), 42);

        env::remove_var("AWSCFG_FROM_FILE");
        clear();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_missing_config_file() {
        clear();
        env::set_var(ENV_CONFIG_FILE, "/nonexistent/awscfg/.env");
        env::set_var(ENV_ENVIRONMENT, "local");
        env::set_var(ENV_CONFIG_PROVIDER, "env");
        assert_eq!(ConfigProvider::from_env("svc").unwrap().name(), "env");
        clear();
    }
}
