use async_trait::async_trait;
use aws_sdk_secretsmanager::error::ProvideErrorMetadata;
use aws_sdk_secretsmanager::Client;
use base64::{engine::general_purpose, Engine};
use tokio::sync::OnceCell;

use super::rt;
use super::{BackendConfig, Provider, ProviderError, RemoteFault};

/// 固定读取当前版本
pub const VERSION_STAGE_CURRENT: &str = "AWSCURRENT";

const BACKEND: &str = "secrets_manager";

/// 远程返回的密钥内容，文本和二进制二选一
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    Text(String),
    /// base64 编码的二进制内容
    Binary(Vec<u8>),
}

impl SecretPayload {
    /// 文本原样返回，二进制先做 base64 解码
    fn into_raw(self, key: &str) -> Result<Vec<u8>, ProviderError> {
        match self {
            SecretPayload::Text(text) => Ok(text.into_bytes()),
            SecretPayload::Binary(encoded) => general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| ProviderError::DecodeFailure {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }
}

/// 读取密钥的远程调用
#[async_trait]
pub trait SecretValueClient: Send + Sync {
    async fn get_secret_value(
        &self,
        secret_id: &str,
        version_stage: &str,
    ) -> Result<SecretPayload, RemoteFault>;

    /// 预热客户端
    async fn warm(&self) {}
}

/// 基于 AWS SDK 的 Secrets Manager 客户端，首次调用时才创建
pub struct AwsSecretsClient {
    config: BackendConfig,
    client: OnceCell<Client>,
}

impl AwsSecretsClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let sdk_config = self.config.load_sdk_config().await;
                let mut builder = aws_sdk_secretsmanager::config::Builder::from(&sdk_config);
                if let Some(region) = self.config.region() {
                    builder = builder.region(region);
                }
                if let Some(endpoint) = &self.config.endpoint {
                    builder = builder.endpoint_url(endpoint);
                }
                if let Some(timeout_config) = self.config.timeout_config() {
                    builder = builder.timeout_config(timeout_config);
                }
                Client::from_conf(builder.build())
            })
            .await
    }
}

#[async_trait]
impl SecretValueClient for AwsSecretsClient {
    async fn get_secret_value(
        &self,
        secret_id: &str,
        version_stage: &str,
    ) -> Result<SecretPayload, RemoteFault> {
        let output = self
            .client()
            .await
            .get_secret_value()
            .secret_id(secret_id)
            .version_stage(version_stage)
            .send()
            .await
            .map_err(|e| RemoteFault {
                code: e.code().map(str::to_string),
                message: Some(e.message().map(str::to_string).unwrap_or_else(|| e.to_string())),
            })?;

        match (output.secret_string(), output.secret_binary()) {
            (Some(text), _) => Ok(SecretPayload::Text(text.to_string())),
            (None, Some(blob)) => Ok(SecretPayload::Binary(blob.as_ref().to_vec())),
            (None, None) => Ok(SecretPayload::Binary(Vec::new())),
        }
    }

    async fn warm(&self) {
        self.client().await;
    }
}

/// AWS Secrets Manager 配置后端
///
/// key 即 SecretId，固定读取 `AWSCURRENT` 版本。写入和导入为空操作。
pub struct SecretsManagerProvider {
    client: Box<dyn SecretValueClient>,
    env: String,
    version_stage: &'static str,
}

impl SecretsManagerProvider {
    /// 构造时不访问网络，客户端在首次读取或 `initialize` 时创建
    pub fn new(config: &BackendConfig) -> Result<Self, ProviderError> {
        config.validate_for(
            BACKEND,
            &[("env", config.env.as_str()), ("region", config.region.as_str())],
        )?;
        Ok(Self::with_client(
            config.env.clone(),
            AwsSecretsClient::new(config.clone()),
        ))
    }

    pub fn with_client(env: impl Into<String>, client: impl SecretValueClient + 'static) -> Self {
        Self {
            client: Box::new(client),
            env: env.into(),
            version_stage: VERSION_STAGE_CURRENT,
        }
    }
}

impl Provider for SecretsManagerProvider {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn import(&self, _data: &[u8]) -> Result<(), ProviderError> {
        Ok(())
    }

    fn initialize(&self) -> Result<(), ProviderError> {
        rt::block_on(self.client.warm())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, ProviderError> {
        tracing::debug!(backend = BACKEND, env = %self.env, key, "fetching secret");
        let payload = rt::block_on(self.client.get_secret_value(key, self.version_stage))?
            .map_err(|fault| ProviderError::from_fault(&fault, BACKEND, key))?;
        payload.into_raw(key)
    }

    fn put(&self, _key: &str, _value: &[u8]) -> Result<(), ProviderError> {
        Ok(())
    }
}
