use crate::core::{AllocationOutcome, Pipeline};
use crate::domain::model::RosterSource;
use crate::utils::error::Result;

/// Result of one full run.
#[derive(Debug, Clone)]
pub struct SeatingRun {
    pub source: RosterSource,
    pub outcome: AllocationOutcome,
    pub output_path: String,
}

pub struct SeatingEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SeatingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<SeatingRun> {
        tracing::info!("🚀 Starting seating allocation");

        let roster = self.pipeline.extract()?;
        if let RosterSource::Sample { reason } = &roster.source {
            tracing::info!("📋 Using sample roster ({})", reason);
        }
        tracing::info!("📥 Roster has {} records", roster.records.len());
        let source = roster.source.clone();

        let outcome = self.pipeline.transform(roster)?;
        tracing::info!(
            "🔀 Allocated {} records into {} groups ({:?})",
            outcome.allocation.total_assigned(),
            outcome.allocation.groups.len(),
            outcome.strategy
        );
        if !outcome.warnings.is_empty() {
            tracing::warn!("⚠️ Allocation finished with {} warning(s)", outcome.warnings.len());
        }

        let output_path = self.pipeline.load(&outcome)?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(SeatingRun {
            source,
            outcome,
            output_path,
        })
    }
}
