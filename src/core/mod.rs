pub mod allocator;
pub mod bucket;
pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{AllocationOutcome, LoadedRoster, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
