use thiserror::Error;

/// 配置访问统一错误类型
///
/// 所有后端的故障都会先归一化为这里的某个变体再返回，
/// 厂商错误码和原始传输错误不会越过后端边界。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("配置不存在: {key}")]
    NotFound { key: String },

    #[error("无法解密密钥: {key}")]
    DecryptionFailure { key: String },

    #[error("服务端内部错误: {key}")]
    InternalServiceError { key: String },

    #[error("无效参数: {key}")]
    InvalidParameter { key: String },

    #[error("请求对资源当前状态无效: {key}")]
    InvalidRequest { key: String },

    #[error("资源不存在: {key}")]
    ResourceNotFound { key: String },

    #[error("解码失败 [{key}]: {reason}")]
    DecodeFailure { key: String, reason: String },

    #[error("类型转换失败 [{key}] -> {target}: {reason}")]
    CoercionFailure {
        key: String,
        target: &'static str,
        reason: String,
    },

    #[error("未知错误: {key}")]
    Unknown { key: String },

    #[error("不支持的配置后端: {0}")]
    UnsupportedBackend(String),

    #[error("配置错误: {0}")]
    InvalidConfig(String),

    #[error("环境变量未设置: {0}")]
    EnvNotSet(&'static str),

    #[error("导入失败: {0}")]
    Import(String),
}

impl ProviderError {
    /// 将厂商错误码映射为统一错误
    ///
    /// 纯函数，覆盖 Secrets Manager 与 Parameter Store 的错误码；
    /// 无法识别的错误码（或没有错误码的传输错误）统一映射为 `Unknown`。
    pub fn from_fault_code(code: Option<&str>, key: &str) -> Self {
        let key = key.to_string();
        match code {
            Some("DecryptionFailure") => ProviderError::DecryptionFailure { key },
            Some("InternalServiceError") | Some("InternalServerError") => {
                ProviderError::InternalServiceError { key }
            }
            Some("InvalidParameterException")
            | Some("ValidationException")
            | Some("InvalidKeyId") => ProviderError::InvalidParameter { key },
            Some("InvalidRequestException") => ProviderError::InvalidRequest { key },
            Some("ResourceNotFoundException") | Some("ParameterVersionNotFound") => {
                ProviderError::ResourceNotFound { key }
            }
            Some("ParameterNotFound") => ProviderError::NotFound { key },
            _ => ProviderError::Unknown { key },
        }
    }

    /// 归一化远程故障，厂商错误码和消息只写日志
    pub fn from_fault(fault: &RemoteFault, backend: &'static str, key: &str) -> Self {
        tracing::warn!(
            backend,
            key,
            code = fault.code.as_deref().unwrap_or("-"),
            message = fault.message.as_deref().unwrap_or("-"),
            "remote config call failed"
        );
        Self::from_fault_code(fault.code.as_deref(), key)
    }

    /// 是否为 key 缺失类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProviderError::NotFound { .. } | ProviderError::ResourceNotFound { .. }
        )
    }
}

/// 远程服务返回的原始故障
///
/// 只在后端内部流转，返回给调用方之前必须经过 [`ProviderError::from_fault`]。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFault {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl RemoteFault {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: Some(message.into()),
        }
    }

    /// 没有错误码的传输层故障（超时、连接失败等）
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: Some(message.into()),
        }
    }
}

/// 必需配置不可用
///
/// `must_get_*` 失败时以此为 panic 负载终止调用流程，
/// 可以通过 `catch_unwind` + `downcast` 取回原始错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("必需配置不可用 [{key}]: {cause}")]
pub struct FatalConfigError {
    pub key: String,
    #[source]
    pub cause: ProviderError,
}
