use std::time::Duration;

use super::coerce;
use super::{FatalConfigError, ProviderError};

/// 配置后端统一接口
///
/// 环境变量、Secrets Manager、Parameter Store 都实现此 trait。
/// 实例构造完成后只读，可以在多个线程中并发调用。
///
/// 访问器分为两类：
/// - `get` / `get_*`：可恢复，失败时返回 [`ProviderError`]
/// - `must_get_*`：致命，失败时不返回，以 [`FatalConfigError`] 为负载终止调用流程，
///   只用于进程启动必需的配置
pub trait Provider: Send + Sync {
    /// 后端名称，用于日志
    fn name(&self) -> &'static str;

    /// 批量导入，不支持的后端为空操作，不会部分生效
    fn import(&self, data: &[u8]) -> Result<(), ProviderError>;

    /// 预热后端（如创建客户端），可以为空操作
    fn initialize(&self) -> Result<(), ProviderError>;

    /// 获取原始值，key 不存在时返回 `NotFound`
    fn get(&self, key: &str) -> Result<Vec<u8>, ProviderError>;

    /// 写入配置，不支持写入的后端直接返回成功且无副作用
    fn put(&self, key: &str, value: &[u8]) -> Result<(), ProviderError>;

    fn get_string(&self, key: &str) -> Result<String, ProviderError> {
        coerce::to_string(key, self.get(key)?)
    }

    fn get_bool(&self, key: &str) -> Result<bool, ProviderError> {
        coerce::to_bool(key, &self.get_string(key)?)
    }

    fn get_int(&self, key: &str) -> Result<i64, ProviderError> {
        coerce::to_int(key, &self.get_string(key)?)
    }

    fn get_duration(&self, key: &str) -> Result<Duration, ProviderError> {
        coerce::to_duration(key, &self.get_string(key)?)
    }

    fn must_get_string(&self, key: &str) -> String {
        self.get_string(key).unwrap_or_else(|e| fatal(key, e))
    }

    fn must_get_bool(&self, key: &str) -> bool {
        self.get_bool(key).unwrap_or_else(|e| fatal(key, e))
    }

    fn must_get_int(&self, key: &str) -> i64 {
        self.get_int(key).unwrap_or_else(|e| fatal(key, e))
    }

    fn must_get_duration(&self, key: &str) -> Duration {
        self.get_duration(key).unwrap_or_else(|e| fatal(key, e))
    }
}

/// 终止当前调用流程，携带原始错误
///
/// 调用方不应捕获后当作普通错误继续运行。
/// 默认 panic hook 无法打印非字符串负载，因此先把 key 和原因写到 stderr，
/// 未安装 tracing subscriber 时也能看到。
pub fn fatal(key: &str, cause: ProviderError) -> ! {
    tracing::error!(key, error = %cause, "required config unavailable");
    let err = FatalConfigError {
        key: key.to_string(),
        cause,
    };
    eprintln!("awscfg: {}", err);
    std::panic::panic_any(err)
}
