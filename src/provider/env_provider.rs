use std::env;

use super::{Provider, ProviderError};

/// 环境变量配置后端
///
/// key 即环境变量名，不做任何前缀转换。不依赖网络和凭证，
/// 适合本地开发和测试。与远程后端不同，它支持写入：
/// `put` 设置当前进程的环境变量，`import` 按 dotenv 格式批量设置。
#[derive(Debug, Default, Clone)]
pub struct EnvProvider;

impl EnvProvider {
    pub fn new() -> Self {
        Self
    }
}

/// `set_var` 对这些输入会 panic，提前拒绝
fn check_var(key: &str, value: &str) -> Result<(), ProviderError> {
    if key.is_empty() || key.contains('=') || key.contains('\0') || value.contains('\0') {
        return Err(ProviderError::InvalidParameter {
            key: key.to_string(),
        });
    }
    Ok(())
}

impl Provider for EnvProvider {
    fn name(&self) -> &'static str {
        "env"
    }

    /// 先完整解析再统一设置，解析失败时不修改任何变量
    fn import(&self, data: &[u8]) -> Result<(), ProviderError> {
        let vars = dotenvy::from_read_iter(data)
            .collect::<Result<Vec<(String, String)>, _>>()
            .map_err(|e| ProviderError::Import(e.to_string()))?;
        for (key, value) in &vars {
            check_var(key, value)?;
        }
        for (key, value) in vars {
            env::set_var(&key, value);
        }
        Ok(())
    }

    fn initialize(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, ProviderError> {
        match env::var_os(key) {
            Some(value) => Ok(value.into_encoded_bytes()),
            None => Err(ProviderError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), ProviderError> {
        let value = std::str::from_utf8(value).map_err(|_| ProviderError::InvalidParameter {
            key: key.to_string(),
        })?;
        check_var(key, value)?;
        env::set_var(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;

    #[test]
    #[serial]
    fn test_get_existing_and_missing() {
        env::set_var("AWSCFG_TEST_X", "v");
        env::remove_var("AWSCFG_TEST_MISSING");

        let p = EnvProvider::new();
        assert_eq!(p.get("AWSCFG_TEST_X").unwrap(), b"v");
        assert_eq!(
            p.get("AWSCFG_TEST_MISSING"),
            Err(ProviderError::NotFound {
                key: "AWSCFG_TEST_MISSING".to_string()
            })
        );

        // 重复读取结果一致
        assert_eq!(p.get("AWSCFG_TEST_X"), p.get("AWSCFG_TEST_X"));
        env::remove_var("AWSCFG_TEST_X");
    }

    #[test]
    #[serial]
    fn test_empty_value_is_not_missing() {
        env::set_var("AWSCFG_TEST_EMPTY", "");
        let p = EnvProvider::new();
        assert_eq!(p.get("AWSCFG_TEST_EMPTY").unwrap(), b"");
        assert_eq!(p.must_get_string("AWSCFG_TEST_EMPTY"), "");
        env::remove_var("AWSCFG_TEST_EMPTY");
    }

    #[test]
    #[serial]
    fn test_must_getters() {
        env::set_var("AWSCFG_TEST_BOOL", "true");
        env::set_var("AWSCFG_TEST_INT", "-12");
        env::set_var("AWSCFG_TEST_DUR", "1h30m");

        let p = EnvProvider::new();
        assert!(p.must_get_bool("AWSCFG_TEST_BOOL"));
        assert_eq!(p.must_get_int("AWSCFG_TEST_INT"), -12);
        assert_eq!(
            p.must_get_duration("AWSCFG_TEST_DUR"),
            Duration::from_secs(90 * 60)
        );

        for key in ["AWSCFG_TEST_BOOL", "AWSCFG_TEST_INT", "AWSCFG_TEST_DUR"] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_key_is_not_prefixed() {
        env::set_var("PLAIN_AWSCFG_KEY", "1");
        let p = EnvProvider::new();
        assert!(p.get("plain_awscfg_key").is_err());
        assert!(p.get_bool("PLAIN_AWSCFG_KEY").unwrap());
        env::remove_var("PLAIN_AWSCFG_KEY");
    }

    #[test]
    #[serial]
    fn test_put_sets_variable() {
        let p = EnvProvider::new();
        p.put("AWSCFG_TEST_PUT", b"written").unwrap();
        assert_eq!(p.get_string("AWSCFG_TEST_PUT").unwrap(), "written");

        assert!(matches!(
            p.put("BAD=KEY", b"v"),
            Err(ProviderError::InvalidParameter { .. })
        ));
        assert!(matches!(
            p.put("AWSCFG_TEST_PUT", &[0xff]),
            Err(ProviderError::InvalidParameter { .. })
        ));
        assert_eq!(p.get_string("AWSCFG_TEST_PUT").unwrap(), "written");
        env::remove_var("AWSCFG_TEST_PUT");
    }

    #[test]
    #[serial]
    fn test_import_dotenv_blob() {
        let p = EnvProvider::new();
        p.import(b"AWSCFG_IMPORT_A=1\n# comment\nAWSCFG_IMPORT_B=\"two words\"\n")
            .unwrap();
        assert_eq!(p.get_string("AWSCFG_IMPORT_A").unwrap(), "1");
        assert_eq!(p.get_string("AWSCFG_IMPORT_B").unwrap(), "two words");
        env::remove_var("AWSCFG_IMPORT_A");
        env::remove_var("AWSCFG_IMPORT_B");
    }

    #[test]
    #[serial]
    fn test_import_is_all_or_nothing() {
        env::remove_var("AWSCFG_IMPORT_OK");
        let p = EnvProvider::new();
        let err = p
            .import(b"AWSCFG_IMPORT_OK=1\nthis line is broken\n")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Import(_)));
        assert!(p.get("AWSCFG_IMPORT_OK").is_err());
    }
}
