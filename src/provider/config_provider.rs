use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{
    fatal, BackendConfig, EnvProvider, ParameterStoreProvider, Provider, ProviderError,
    ProviderOptions, SecretsManagerProvider,
};

pub const SOURCE_PARAMETER_STORE: &str = "parameter_store";
pub const SOURCE_SECRETS_MANAGER: &str = "secrets_manager";
pub const SOURCE_ENV: &str = "env";

/// 配置访问门面
///
/// 只包装一个后端实例并转发所有调用，调用方无论选择哪个后端都只依赖这一个类型。
///
/// # 示例
/// ```no_run
/// use awscfg::{BackendConfig, ConfigProvider, Provider};
///
/// let provider = ConfigProvider::new("env", &BackendConfig::default()).unwrap();
/// let port = provider.must_get_int("PORT");
/// let debug = provider.get_bool("DEBUG").unwrap_or(false);
/// ```
pub struct ConfigProvider {
    backend: Box<dyn Provider>,
}

impl ConfigProvider {
    /// 按名称选择后端
    ///
    /// 名称精确匹配、区分大小写；无法识别时立即返回 `UnsupportedBackend`。
    /// 构造过程不发起网络请求。
    pub fn new(source: &str, config: &BackendConfig) -> Result<Self, ProviderError> {
        let backend: Box<dyn Provider> = match source {
            SOURCE_PARAMETER_STORE => Box::new(ParameterStoreProvider::new(config)?),
            SOURCE_SECRETS_MANAGER => Box::new(SecretsManagerProvider::new(config)?),
            SOURCE_ENV => Box::new(EnvProvider::new()),
            _ => return Err(ProviderError::UnsupportedBackend(source.to_string())),
        };
        tracing::info!(backend = backend.name(), env = %config.env, "config provider created");
        Ok(Self { backend })
    }

    pub fn from_options(options: &ProviderOptions) -> Result<Self, ProviderError> {
        Self::new(&options.type_name, &options.options)
    }

    /// 包装自定义后端
    pub fn from_backend(backend: impl Provider + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// 读取 JSON 值并反序列化，解析失败视为类型转换失败
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T, ProviderError> {
        let value = self.backend.get_string(key)?;
        serde_json::from_str(&value).map_err(|e| ProviderError::CoercionFailure {
            key: key.to_string(),
            target: "json",
            reason: e.to_string(),
        })
    }

    pub fn must_get_json<T: DeserializeOwned>(&self, key: &str) -> T {
        self.get_json(key).unwrap_or_else(|e| fatal(key, e))
    }
}

impl Provider for ConfigProvider {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    fn import(&self, data: &[u8]) -> Result<(), ProviderError> {
        self.backend.import(data)
    }

    fn initialize(&self) -> Result<(), ProviderError> {
        self.backend.initialize()
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, ProviderError> {
        self.backend.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), ProviderError> {
        self.backend.put(key, value)
    }

    fn get_string(&self, key: &str) -> Result<String, ProviderError> {
        self.backend.get_string(key)
    }

    fn get_bool(&self, key: &str) -> Result<bool, ProviderError> {
        self.backend.get_bool(key)
    }

    fn get_int(&self, key: &str) -> Result<i64, ProviderError> {
        self.backend.get_int(key)
    }

    fn get_duration(&self, key: &str) -> Result<Duration, ProviderError> {
        self.backend.get_duration(key)
    }
}
