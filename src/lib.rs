//! awscfg - 统一配置访问层
//!
//! 服务启动和运行时配置（字符串、布尔、整数、时长、密钥）可以来自不同的后端，
//! 调用方只依赖一个 [`ConfigProvider`]。
//!
//! ## 后端
//!
//! - **env**: 进程环境变量
//! - **secrets_manager**: AWS Secrets Manager（文本或 base64 二进制密钥）
//! - **parameter_store**: AWS SSM Parameter Store（`/{env}/{service}/{key}`）
//!
//! ## 访问器
//!
//! - `get` / `get_*`: 可恢复，失败返回 [`ProviderError`]
//! - `must_get_*`: 致命，失败时以 [`FatalConfigError`] 终止调用流程，只用于启动必需配置

pub mod provider;

pub use provider::{
    BackendConfig, ConfigProvider, DbConfig, EnvProvider, FatalConfigError,
    ParameterStoreProvider, Provider, ProviderError, ProviderOptions, SecretsManagerProvider,
};
