use crate::core::persistence::{DEFAULT_DOCUMENT_FILE, DEFAULT_MARKUP_FILE};
use crate::domain::ports::ConfigProvider;
use crate::domain::services::{Organization, PetShop, VetClinic};
use crate::utils::error::{RegistryError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub petshop: Option<OrganizationConfig>,
    pub vetclinic: Option<OrganizationConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub document_file: Option<String>,
    pub markup_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    /// "compact" (default) or "json".
    pub format: Option<String>,
}

impl OrganizationConfig {
    fn to_organization(&self) -> Organization {
        Organization::new(self.name.clone(), self.address.clone().unwrap_or_default())
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RegistryError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RegistryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PET_DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RegistryError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        super::validate_storage(self)?;

        let organizations = [
            ("petshop.name", &self.petshop),
            ("vetclinic.name", &self.vetclinic),
        ];
        for (field, organization) in organizations {
            if let Some(organization) = organization {
                validate_non_empty_string(field, &organization.name)?;
            }
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !matches!(format, "compact" | "json") {
                return Err(RegistryError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.format.as_deref()) == Some("json")
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn document_file(&self) -> &str {
        self.storage
            .document_file
            .as_deref()
            .unwrap_or(DEFAULT_DOCUMENT_FILE)
    }

    fn markup_file(&self) -> &str {
        self.storage
            .markup_file
            .as_deref()
            .unwrap_or(DEFAULT_MARKUP_FILE)
    }

    fn petshop(&self) -> Organization {
        self.petshop
            .as_ref()
            .map(OrganizationConfig::to_organization)
            .unwrap_or_else(|| PetShop::default().organization)
    }

    fn vetclinic(&self) -> Organization {
        self.vetclinic
            .as_ref()
            .map(OrganizationConfig::to_organization)
            .unwrap_or_else(|| VetClinic::default().organization)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
