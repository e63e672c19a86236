pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    allocator::{allocate, seeded_rng, GroupAllocator},
    engine::{SeatingEngine, SeatingRun},
    pipeline::RosterPipeline,
};
pub use domain::model::{
    Allocation, AllocationOutcome, AllocationStrategy, AllocationWarning, Assignment, Category,
    CategoryLabels, GroupConfig, GroupSpec, Record,
};
pub use utils::error::{Result, SeatingError};
