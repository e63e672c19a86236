use crate::adapters::export::ExportFormat;
use crate::core::ConfigProvider;
use crate::domain::model::{CategoryLabels, GroupConfig};
use crate::utils::error::{Result, SeatingError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "seating_result.csv";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub categories: CategoryLabels,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
    #[serde(default)]
    pub groups: GroupConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    pub input_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub seed: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SeatingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SeatingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROSTER_PATH})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SeatingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_file_extension("output.path", &self.output.path, &ExportFormat::EXTENSIONS)?;

        if let Some(input) = &self.roster.input_path {
            validation::validate_path("roster.input_path", input)?;
        }

        if self.groups.is_empty() {
            return Err(SeatingError::MissingConfigError {
                field: "groups".to_string(),
            });
        }
        for group in &self.groups {
            validation::validate_non_empty_string("groups.name", &group.name)?;
            validation::validate_positive_number(&format!("groups.{}.size", group.name), group.size, 1)?;
        }
        validation::validate_unique("groups.name", self.groups.iter().map(|g| g.name.as_str()))?;

        if self.categories.first.is_empty() {
            return Err(SeatingError::MissingConfigError {
                field: "categories.first".to_string(),
            });
        }
        if self.categories.second.is_empty() {
            return Err(SeatingError::MissingConfigError {
                field: "categories.second".to_string(),
            });
        }
        for label in self.categories.first.iter().chain(&self.categories.second) {
            validation::validate_non_empty_string("categories", label)?;
        }
        if let Some(shared) = self
            .categories
            .first
            .iter()
            .find(|label| self.categories.second.iter().any(|other| other.eq_ignore_ascii_case(label)))
        {
            return Err(SeatingError::ConfigValidationError {
                field: "categories".to_string(),
                message: format!("label '{}' appears in both categories", shared),
            });
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> Option<&str> {
        self.roster.input_path.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn groups(&self) -> &GroupConfig {
        &self.groups
    }

    fn categories(&self) -> &CategoryLabels {
        &self.categories
    }

    fn seed(&self) -> Option<u64> {
        self.allocation.seed
    }
}
