use async_trait::async_trait;
use aws_sdk_ssm::error::ProvideErrorMetadata;
use aws_sdk_ssm::Client;
use tokio::sync::OnceCell;

use super::rt;
use super::{BackendConfig, Provider, ProviderError, RemoteFault};

const BACKEND: &str = "parameter_store";

/// 读取参数的远程调用，`Ok(None)` 表示参数存在但没有值
#[async_trait]
pub trait ParameterClient: Send + Sync {
    async fn get_parameter(&self, name: &str) -> Result<Option<String>, RemoteFault>;

    async fn warm(&self) {}
}

/// 基于 AWS SDK 的 SSM 客户端，首次调用时才创建
pub struct AwsParameterClient {
    config: BackendConfig,
    client: OnceCell<Client>,
}

impl AwsParameterClient {
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
                let mut builder = aws_sdk_ssm::config::Builder::from(&sdk_config);
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
impl ParameterClient for AwsParameterClient {
    async fn get_parameter(&self, name: &str) -> Result<Option<String>, RemoteFault> {
        let output = self
            .client()
            .await
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| RemoteFault {
                code: e.code().map(str::to_string),
                message: Some(e.message().map(str::to_string).unwrap_or_else(|| e.to_string())),
            })?;

        Ok(output
            .parameter()
            .and_then(|p| p.value())
            .map(str::to_string))
    }

    async fn warm(&self) {
        self.client().await;
    }
}

/// AWS SSM Parameter Store 配置后端
///
/// key 映射为 `/{env}/{service_name}/{key}`，SecureString 自动解密。写入和导入为空操作。
pub struct ParameterStoreProvider {
    client: Box<dyn ParameterClient>,
    prefix: String,
}

impl ParameterStoreProvider {
    pub fn new(config: &BackendConfig) -> Result<Self, ProviderError> {
        config.validate_for(
            BACKEND,
            &[
                ("env", config.env.as_str()),
                ("service_name", config.service_name.as_str()),
            ],
        )?;
        Ok(Self::with_client(
            &config.env,
            &config.service_name,
            AwsParameterClient::new(config.clone()),
        ))
    }

    pub fn with_client(env: &str, service_name: &str, client: impl ParameterClient + 'static) -> Self {
        Self {
            client: Box::new(client),
            prefix: format!("/{}/{}", env.trim_matches('/'), service_name.trim_matches('/')),
        }
    }

    /// 完整参数路径
    pub fn parameter_name(&self, key: &str) -> String {
        format!("{}/{}", self.prefix, key.trim_start_matches('/'))
    }
}

impl Provider for ParameterStoreProvider {
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
        let name = self.parameter_name(key);
        tracing::debug!(backend = BACKEND, key, parameter = %name, "fetching parameter");
        match rt::block_on(self.client.get_parameter(&name))? {
            Ok(Some(value)) => Ok(value.into_bytes()),
            Ok(None) => Err(ProviderError::NotFound {
                key: key.to_string(),
            }),
            Err(fault) => Err(ProviderError::from_fault(&fault, BACKEND, key)),
        }
    }

    fn put(&self, _key: &str, _value: &[u8]) -> Result<(), ProviderError> {
        Ok(())
    }
}
