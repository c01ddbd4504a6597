pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extensions, validate_path};

#[cfg(feature = "cli")]
use crate::app::commands::Command;
#[cfg(feature = "cli")]
use crate::core::persistence::{DEFAULT_DOCUMENT_FILE, DEFAULT_MARKUP_FILE};
#[cfg(feature = "cli")]
use crate::domain::services::{Organization, PetShop, VetClinic};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "pet-registry")]
#[command(about = "Pet owners, shop stock and clinic visits, saved as JSON with an XML export")]
pub struct CliConfig {
    #[arg(long, global = true, default_value = "./data")]
    pub data_dir: String,

    #[arg(long, global = true, default_value = DEFAULT_DOCUMENT_FILE)]
    pub document_file: String,

    #[arg(long, global = true, default_value = DEFAULT_MARKUP_FILE)]
    pub markup_file: String,

    /// TOML configuration file; replaces the storage flags when given
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn document_file(&self) -> &str {
        &self.document_file
    }

    fn markup_file(&self) -> &str {
        &self.markup_file
    }

    fn petshop(&self) -> Organization {
        PetShop::default().organization
    }

    fn vetclinic(&self) -> Organization {
        VetClinic::default().organization
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_storage(self)
    }
}

/// Checks the storage locations any provider points at.
pub fn validate_storage<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("data_dir", config.data_dir())?;
    validate_path("document_file", config.document_file())?;
    validate_path("markup_file", config.markup_file())?;
    validate_file_extensions("document_file", &[config.document_file()], &["json"])?;
    validate_file_extensions("markup_file", &[config.markup_file()], &["xml"])?;
    Ok(())
}
