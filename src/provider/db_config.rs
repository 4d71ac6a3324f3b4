use serde::{Deserialize, Serialize};
use std::fmt;

/// 数据库连接密钥
///
/// 对应 Secrets Manager 中 RDS 托管密钥的 JSON 结构，
/// 通过 [`ConfigProvider::get_json`](super::ConfigProvider::get_json) 读取。
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DbConfig {
    #[serde(default)]
    pub db_cluster_identifier: String,
    pub password: String,
    pub engine: String,
    pub port: u16,
    pub host: String,
    pub username: String,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("db_cluster_identifier", &self.db_cluster_identifier)
            .field("password", &"***")
            .field("engine", &self.engine)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("username", &self.username)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_rds_secret() {
        let config: DbConfig = serde_json::from_str(
            r#"{
                "dbClusterIdentifier": "billing-cluster",
                "password": "p@ss",
                "engine": "postgres",
                "port": 5432,
                "host": "billing.cluster-abc.us-east-1.rds.amazonaws.com",
                "username": "billing"
            }"#,
        )
        .unwrap();
        assert_eq!(config.db_cluster_identifier, "billing-cluster");
        assert_eq!(config.port, 5432);
        assert_eq!(config.engine, "postgres");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config: DbConfig = serde_json::from_str(
            r#"{"password": "p@ss", "engine": "mysql", "port": 3306, "host": "h", "username": "u"}"#,
        )
        .unwrap();
        assert_eq!(config.db_cluster_identifier, "");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("p@ss"));
        assert!(debug.contains("mysql"));
    }
}
