// Adapters layer: roster input, result export and the console report.

pub mod export;
pub mod report;
pub mod roster;
