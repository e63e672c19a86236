use crate::adapters::{export, roster};
use crate::core::allocator::{seeded_rng, GroupAllocator};
use crate::core::{AllocationOutcome, ConfigProvider, LoadedRoster, Pipeline, Storage};
use crate::utils::error::Result;

/// Roster file in, seating table out.
pub struct RosterPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> RosterPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for RosterPipeline<S, C> {
    fn extract(&self) -> Result<LoadedRoster> {
        Ok(roster::load_roster(
            &self.storage,
            self.config.input_path(),
            self.config.categories(),
        ))
    }

    fn transform(&self, roster: LoadedRoster) -> Result<AllocationOutcome> {
        if let Some(seed) = self.config.seed() {
            tracing::debug!("Using fixed seed {}", seed);
        }
        let mut rng = seeded_rng(self.config.seed());
        let allocator = GroupAllocator::new(self.config.groups().clone());
        Ok(allocator.allocate(&roster.records, &mut rng))
    }

    fn load(&self, outcome: &AllocationOutcome) -> Result<String> {
        export::export(
            &self.storage,
            &outcome.allocation,
            self.config.categories(),
            self.config.output_path(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::export::{read_assignments, ExportFormat};
    use crate::config::toml_config::TomlConfig;
    use crate::domain::model::{AllocationStrategy, GroupConfig, GroupSpec, RosterSource};
    use crate::utils::error::SeatingError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.borrow().get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.borrow().get(path).cloned().ok_or_else(|| {
                SeatingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.borrow_mut().insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn config_with(input: Option<&str>, groups: GroupConfig) -> TomlConfig {
        let mut config = TomlConfig::default();
        config.roster.input_path = input.map(str::to_string);
        config.allocation.seed = Some(99);
        config.groups = groups;
        config
    }

    #[test]
    fn test_extract_reads_roster_file() {
        let storage = MockStorage::default();
        storage
            .write_file("class.csv", "id,name,sex,class\n1,Ann,F,241\n2,Bob,M,241\n".as_bytes())
            .unwrap();
        let pipeline = RosterPipeline::new(storage, config_with(Some("class.csv"), GroupConfig::default()));

        let roster = pipeline.extract().unwrap();
        assert_eq!(roster.records.len(), 2);
        assert_eq!(roster.source, RosterSource::File("class.csv".to_string()));
    }

    #[test]
    fn test_extract_falls_back_to_sample() {
        let pipeline = RosterPipeline::new(
            MockStorage::default(),
            config_with(Some("missing.csv"), GroupConfig::default()),
        );

        let roster = pipeline.extract().unwrap();
        assert_eq!(roster.records.len(), 34);
        assert!(matches!(roster.source, RosterSource::Sample { .. }));
    }

    #[test]
    fn test_transform_is_reproducible_with_seed() {
        let pipeline = RosterPipeline::new(MockStorage::default(), config_with(None, GroupConfig::default()));

        let first = pipeline.transform(pipeline.extract().unwrap()).unwrap();
        let second = pipeline.transform(pipeline.extract().unwrap()).unwrap();

        assert_eq!(first.strategy, AllocationStrategy::Proportional);
        assert_eq!(first.allocation.assignments(), second.allocation.assignments());
    }

    #[test]
    fn test_load_writes_sorted_table() {
        let storage = MockStorage::default();
        let groups = GroupConfig::new(vec![GroupSpec::new("B", 17), GroupSpec::new("A", 17)]);
        let pipeline = RosterPipeline::new(storage.clone(), config_with(None, groups));

        let outcome = pipeline.transform(pipeline.extract().unwrap()).unwrap();
        let path = pipeline.load(&outcome).unwrap();

        assert_eq!(path, "seating_result.csv");
        let data = storage.get_file("seating_result.csv").unwrap();
        let rows = read_assignments(&data, ExportFormat::Csv).unwrap();
        assert_eq!(rows.len(), 34);
        assert_eq!(rows[0].group, "A");
        assert_eq!(rows[0].seat, 1);
        assert_eq!(rows[33].group, "B");
        assert_eq!(rows[33].seat, 17);
    }
}
