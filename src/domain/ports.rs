use crate::domain::model::{AllocationOutcome, CategoryLabels, GroupConfig, LoadedRoster};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    /// `None` means use the built-in sample roster.
    fn input_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn groups(&self) -> &GroupConfig;
    fn categories(&self) -> &CategoryLabels;
    fn seed(&self) -> Option<u64>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<LoadedRoster>;
    fn transform(&self, roster: LoadedRoster) -> Result<AllocationOutcome>;
    fn load(&self, outcome: &AllocationOutcome) -> Result<String>;
}
