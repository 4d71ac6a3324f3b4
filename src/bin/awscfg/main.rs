// awscfg - read a single configuration value from any supported backend

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use awscfg::provider::duration::{format_duration, parse_duration};
use awscfg::{BackendConfig, ConfigProvider, Provider, ProviderError, ProviderOptions};
use cli::{Cli, Commands, GetArgs, ValueKind};

/// key 不存在时的退出码，便于脚本区分缺失和其他故障
const EXIT_NOT_FOUND: u8 = 2;

fn init_tracing(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_provider(cli: &Cli) -> Result<ConfigProvider> {
    if let Some(path) = &cli.options {
        let options = ProviderOptions::from_file(Path::new(path))
            .with_context(|| format!("Failed to load provider options: {}", path))?;
        return Ok(ConfigProvider::from_options(&options)?);
    }

    let mut config = BackendConfig::new(&cli.env, &cli.service, &cli.region);
    if let Some(timeout) = &cli.timeout {
        config = config.with_timeout(
            parse_duration(timeout).with_context(|| format!("Invalid timeout: {}", timeout))?,
        );
    }
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    Ok(ConfigProvider::new(&cli.provider, &config)?)
}

fn execute_get(args: &GetArgs, provider: &ConfigProvider) -> Result<String, ProviderError> {
    let key = args.key.as_str();
    let value = match args.kind {
        ValueKind::String => provider.get_string(key)?,
        ValueKind::Bool => provider.get_bool(key)?.to_string(),
        ValueKind::Int => provider.get_int(key)?.to_string(),
        ValueKind::Duration => format_duration(provider.get_duration(key)?),
    };
    Ok(value)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let provider = build_provider(&cli)?;

    match &cli.command {
        Commands::Get(args) => match execute_get(args, &provider) {
            Ok(value) => println!("{}", value),
            Err(e) if e.is_not_found() => {
                eprintln!("{}", e);
                return Ok(ExitCode::from(EXIT_NOT_FOUND));
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use awscfg::EnvProvider;
    use serial_test::serial;

    fn get_args(argv: &[&str]) -> GetArgs {
        match Cli::parse_from(argv).command {
            Commands::Get(args) => args,
        }
    }

    #[test]
    #[serial]
    fn test_execute_get_formats_value() {
        std::env::set_var("AWSCFG_CLI_TIMEOUT", "90s");
        let provider = ConfigProvider::from_backend(EnvProvider::new());

        let args = get_args(&["awscfg", "-p", "env", "get", "AWSCFG_CLI_TIMEOUT", "--as", "duration"]);
        assert_eq!(args.kind, ValueKind::Duration);
        assert_eq!(execute_get(&args, &provider).unwrap(), "1m30s");

        let args = get_args(&["awscfg", "get", "AWSCFG_CLI_TIMEOUT", "--as", "int"]);
        assert!(matches!(
            execute_get(&args, &provider),
            Err(ProviderError::CoercionFailure { target: "int", .. })
        ));
        std::env::remove_var("AWSCFG_CLI_TIMEOUT");
    }

    #[test]
    #[serial]
    fn test_execute_get_missing_key_is_not_found() {
        std::env::remove_var("AWSCFG_CLI_MISSING");
        let provider = ConfigProvider::from_backend(EnvProvider::new());
        let err = execute_get(&get_args(&["awscfg", "get", "AWSCFG_CLI_MISSING"]), &provider).unwrap_err();
        assert!(err.is_not_found());
    }
}
