//! provider 模块 - 统一配置访问
//!
//! 通过同一个 [`Provider`] 接口读取环境变量、AWS Secrets Manager、
//! AWS SSM Parameter Store 中的配置

mod config;
mod config_provider;
mod core;
mod db_config;
mod env_provider;
mod error;
mod loader;
mod parameter_store_provider;
mod rt;
mod secrets_manager_provider;

pub mod coerce;
pub mod duration;

pub use config::{BackendConfig, ProviderOptions};
pub use config_provider::{
    ConfigProvider, SOURCE_ENV, SOURCE_PARAMETER_STORE, SOURCE_SECRETS_MANAGER,
};
pub use self::core::{fatal, Provider};
pub use db_config::DbConfig;
pub use env_provider::EnvProvider;
pub use error::{FatalConfigError, ProviderError, RemoteFault};
pub use loader::{ENV_AWS_REGION, ENV_CONFIG_FILE, ENV_CONFIG_PROVIDER, ENV_ENVIRONMENT};
pub use parameter_store_provider::{AwsParameterClient, ParameterClient, ParameterStoreProvider};
pub use secrets_manager_provider::{
    AwsSecretsClient, SecretPayload, SecretValueClient, SecretsManagerProvider,
    VERSION_STAGE_CURRENT,
};
