use anyhow::Result;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::fmt;
use std::time::Duration;

use super::duration::{serde_as, HumanDur};
use super::ProviderError;

/// 配置后端构造参数
///
/// 进程生命周期内只构造一次，构造后不再修改。
///
/// 凭证获取顺序（优先级从高到低）：
/// 1. `sdk_config` - 调用方传入的共享会话
/// 2. `access_key_id` + `secret_access_key` - 直接配置的访问密钥
/// 3. 默认凭证链（环境变量、`~/.aws/credentials`、ECS/EC2 元数据等）
#[serde_as]
#[derive(Deserialize, Serialize, SmartDefault, Clone, Validate)]
#[serde(default)]
pub struct BackendConfig {
    /// 部署环境（如 dev、staging、prod），远程后端必填
    #[garde(length(max = 128))]
    pub env: String,

    /// 服务名，Parameter Store 用它组成 key 的路径前缀
    #[garde(length(max = 128))]
    pub service_name: String,

    /// AWS 区域，Secrets Manager 必填；Parameter Store 为空时走默认解析链
    #[garde(length(max = 64))]
    pub region: String,

    /// 自定义端点（用于 LocalStack 等兼容服务）
    #[garde(skip)]
    pub endpoint: Option<String>,

    /// 单次远程调用超时，未设置时使用 SDK 默认值
    #[serde_as(as = "Option<HumanDur>")]
    #[garde(skip)]
    pub timeout: Option<Duration>,

    #[garde(skip)]
    pub access_key_id: Option<String>,

    #[garde(skip)]
    pub secret_access_key: Option<String>,

    /// 共享 AWS 会话，与底层客户端共享引用
    #[serde(skip)]
    #[garde(skip)]
    pub sdk_config: Option<SdkConfig>,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("env", &self.env)
            .field("service_name", &self.service_name)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("sdk_config", &self.sdk_config.is_some())
            .finish()
    }
}

impl BackendConfig {
    pub fn new(env: impl Into<String>, service_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            service_name: service_name.into(),
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn with_sdk_config(mut self, sdk_config: SdkConfig) -> Self {
        self.sdk_config = Some(sdk_config);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// 校验字段格式，并检查指定后端的必填字段
    pub(crate) fn validate_for(&self, backend: &str, required: &[(&str, &str)]) -> Result<(), ProviderError> {
        if let Err(errors) = self.validate() {
            return Err(ProviderError::InvalidConfig(format!("{}", errors)));
        }
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ProviderError::InvalidConfig(format!(
                    "{} 后端缺少必填字段 {}",
                    backend, field
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn region(&self) -> Option<Region> {
        (!self.region.is_empty()).then(|| Region::new(self.region.clone()))
    }

    pub(crate) fn timeout_config(&self) -> Option<TimeoutConfig> {
        self.timeout
            .map(|t| TimeoutConfig::builder().operation_timeout(t).build())
    }

    /// 获取共享会话，未传入时按默认凭证链加载
    pub(crate) async fn load_sdk_config(&self) -> SdkConfig {
        if let Some(sdk_config) = &self.sdk_config {
            return sdk_config.clone();
        }

        let mut builder = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = self.region() {
            builder = builder.region(region);
        }
        if let (Some(ak), Some(sk)) = (&self.access_key_id, &self.secret_access_key) {
            builder = builder.credentials_provider(Credentials::new(ak, sk, None, None, "awscfg"));
        }
        if let Some(timeout_config) = self.timeout_config() {
            builder = builder.timeout_config(timeout_config);
        }
        builder.load().await
    }
}

/// 后端选择选项
///
/// ```ignore
/// let opts = ProviderOptions::from_json(r#"{
///     type: "parameter_store",
///     options: { env: "prod", service_name: "billing", timeout: "3s" },
/// }"#)?;
/// let provider = ConfigProvider::from_options(&opts)?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOptions {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub options: BackendConfig,
}

impl ProviderOptions {
    /// 从 JSON 字符串创建（支持 JSON5 格式）
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(json5::from_str(json_str)?)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// 按扩展名选择格式：`.yaml`/`.yml`、`.toml`，其余按 JSON5 解析
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
