pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{GroupConfig, GroupSpec};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "class-seating")]
#[command(about = "Split a class roster into gender-balanced groups and assign seats")]
pub struct CliConfig {
    /// Roster table (.csv or .tsv); the built-in sample roster is used when absent or unreadable
    pub input: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output file (.csv, .tsv or .json)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Fix the random seed for a reproducible allocation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Group sizes in declaration order, e.g. A=6,B=6,C=5
    #[arg(long, value_delimiter = ',')]
    pub groups: Vec<GroupSpec>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取配置檔（若有）並套用命令列覆蓋
    pub fn resolve(&self) -> Result<toml_config::TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                toml_config::TomlConfig::from_file(path)?
            }
            None => toml_config::TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut toml_config::TomlConfig) {
        if let Some(input) = &self.input {
            config.roster.input_path = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(seed) = self.seed {
            config.allocation.seed = Some(seed);
        }
        if !self.groups.is_empty() {
            config.groups = self.groups.iter().cloned().collect::<GroupConfig>();
        }
    }
}
