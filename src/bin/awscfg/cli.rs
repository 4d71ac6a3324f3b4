// CLI argument definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "awscfg")]
#[command(author = "hatlonely <hatlonely@foxmail.com>")]
#[command(version = "0.1.0")]
#[command(about = "Read configuration from env vars, AWS Secrets Manager or SSM Parameter Store", long_about = None)]
pub struct Cli {
    /// Backend: env, secrets_manager or parameter_store
    #[arg(short, long, global = true, env = "CONFIG_PROVIDER", default_value = "secrets_manager")]
    pub provider: String,

    /// Deployment environment name
    #[arg(short, long, global = true, env = "HMD_ENVIRONMENT", default_value = "")]
    pub env: String,

    /// Service name used to scope parameter store keys
    #[arg(short, long, global = true, default_value = "")]
    pub service: String,

    /// AWS region
    #[arg(short, long, global = true, env = "AWS_REGION", default_value = "")]
    pub region: String,

    /// Remote call timeout, e.g. 3s or 500ms
    #[arg(long, global = true)]
    pub timeout: Option<String>,

    /// Custom endpoint URL (e.g. LocalStack)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Provider options file (json5/yaml/toml); overrides the flags above
    #[arg(short, long, global = true)]
    pub options: Option<String>,

    /// Log filter, e.g. warn or awscfg=debug
    #[arg(long, global = true, env = "AWSCFG_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a value and print it
    Get(GetArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Key to read
    pub key: String,

    /// Interpret the value as this type
    #[arg(long = "as", value_enum, default_value_t = ValueKind::String)]
    pub kind: ValueKind,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    Int,
    Duration,
}
