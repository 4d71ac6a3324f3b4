//! 原始配置值到基础类型的转换

use std::time::Duration;

use super::duration::parse_duration;
use super::ProviderError;

/// 字节转字符串，非 UTF-8 视为解码失败
pub fn to_string(key: &str, raw: Vec<u8>) -> Result<String, ProviderError> {
    String::from_utf8(raw).map_err(|e| ProviderError::DecodeFailure {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// 接受 `1 t T TRUE true True` 与 `0 f F FALSE false False`
pub fn to_bool(key: &str, value: &str) -> Result<bool, ProviderError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(coercion_failure(key, "bool", "不是合法的布尔值")),
    }
}

/// 十进制有符号整数，不允许首尾空白
pub fn to_int(key: &str, value: &str) -> Result<i64, ProviderError> {
    value
        .parse::<i64>()
        .map_err(|e| coercion_failure(key, "int", &e.to_string()))
}

pub fn to_duration(key: &str, value: &str) -> Result<Duration, ProviderError> {
    parse_duration(value).map_err(|e| coercion_failure(key, "duration", &e.to_string()))
}

fn coercion_failure(key: &str, target: &'static str, reason: &str) -> ProviderError {
    ProviderError::CoercionFailure {
        key: key.to_string(),
        target,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bool() {
        for v in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(to_bool("k", v).unwrap(), "{}", v);
        }
        for v in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!to_bool("k", v).unwrap(), "{}", v);
        }
        for v in ["notabool", "yes", "tRUE", " true", ""] {
            assert!(
                matches!(
                    to_bool("k", v),
                    Err(ProviderError::CoercionFailure { target: "bool", .. })
                ),
                "{}",
                v
            );
        }
    }

    #[test]
    fn test_to_int() {
        assert_eq!(to_int("k", "42").unwrap(), 42);
        assert_eq!(to_int("k", "-7").unwrap(), -7);
        assert_eq!(to_int("k", "+8").unwrap(), 8);
        assert!(to_int("k", " 42").is_err());
        assert!(to_int("k", "42 ").is_err());
        assert!(to_int("k", "4.2").is_err());
        assert!(to_int("k", "0x10").is_err());
        assert!(to_int("k", "").is_err());
        assert!(to_int("k", "99999999999999999999").is_err());
    }

    #[test]
    fn test_to_duration() {
        assert_eq!(
            to_duration("k", "1h30m").unwrap(),
            Duration::from_secs(90 * 60)
        );
        match to_duration("TIMEOUT", "garbage") {
            Err(ProviderError::CoercionFailure { key, target, .. }) => {
                assert_eq!(key, "TIMEOUT");
                assert_eq!(target, "duration");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_to_string_invalid_utf8() {
        assert_eq!(to_string("k", b"ok".to_vec()).unwrap(), "ok");
        assert!(matches!(
            to_string("k", vec![0xff, 0xfe]),
            Err(ProviderError::DecodeFailure { .. })
        ));
    }
}
