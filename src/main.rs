use anyhow::Context;
use clap::Parser;
use pet_registry::domain::ports::ConfigProvider;
use pet_registry::utils::{logger, validation::Validate};
use pet_registry::{execute, CliConfig, LocalStorage, PersistenceEngine, TomlConfig};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = cli
        .config
        .as_deref()
        .map(TomlConfig::from_file)
        .transpose()
        .with_context(|| format!("failed to load config file {:?}", cli.config))?;

    // 初始化日誌
    let verbose = cli.verbose || file_config.as_ref().is_some_and(TomlConfig::verbose);
    if cli.json_logs || file_config.as_ref().is_some_and(TomlConfig::json_logs) {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let validation = match &file_config {
        Some(config) => config.validate(),
        None => cli.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let config: &dyn ConfigProvider = match &file_config {
        Some(config) => config,
        None => &cli,
    };
    let storage = LocalStorage::new(config.data_dir());
    tracing::debug!("Data directory: {}", storage.base_path().display());
    let engine = PersistenceEngine::from_config(storage, config);

    let stdout = std::io::stdout();
    if let Err(e) = execute(&engine, &cli.command, &mut stdout.lock()) {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // lookup errors are the caller's to retry
        let exit_code = if e.is_lookup() { 2 } else { 1 };
        std::process::exit(exit_code);
    }

    Ok(())
}
