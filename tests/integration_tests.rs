use anyhow::Result;
use class_seating::adapters::export::{read_assignments, ExportFormat};
use class_seating::adapters::roster::sample_roster;
use class_seating::domain::model::RosterSource;
use class_seating::{
    AllocationStrategy, AllocationWarning, Category, GroupConfig, GroupSpec, LocalStorage,
    RosterPipeline, SeatingEngine, TomlConfig,
};
use std::collections::HashMap;
use tempfile::TempDir;

/// 22 名第一類、12 名第二類，中文表頭
fn write_roster(dir: &TempDir) -> Result<()> {
    let mut content = String::from("学号,姓名,性别,班级\n");
    for i in 0..22 {
        content.push_str(&format!("24070701{:02},男生{},男,物流241\n", i, i));
    }
    for i in 0..12 {
        content.push_str(&format!("24070702{:02},女生{},女,物流242\n", i, i));
    }
    std::fs::write(dir.path().join("roster.csv"), content)?;
    Ok(())
}

fn config_for(input: Option<&str>, output: &str, groups: GroupConfig) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.roster.input_path = input.map(str::to_string);
    config.output.path = output.to_string();
    config.allocation.seed = Some(2025);
    config.groups = groups;
    config
}

#[test]
fn test_end_to_end_34_record_roster() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_roster(&temp_dir)?;

    let config = config_for(Some("roster.csv"), "out/result.csv", GroupConfig::default());
    let engine = SeatingEngine::new(RosterPipeline::new(LocalStorage::new(temp_dir.path()), config));

    let run = engine.run()?;

    assert_eq!(run.source, RosterSource::File("roster.csv".to_string()));
    assert_eq!(run.outcome.strategy, AllocationStrategy::Proportional);
    assert!(run.outcome.warnings.is_empty());
    for spec in &GroupConfig::default() {
        let group = run.outcome.allocation.get(&spec.name).unwrap();
        assert_eq!(group.len(), spec.size);
    }
    let first: usize = run.outcome.allocation.groups.iter().map(|g| g.count(Category::First)).sum();
    let second: usize = run.outcome.allocation.groups.iter().map(|g| g.count(Category::Second)).sum();
    assert_eq!((first, second), (22, 12));

    // 匯出後重新讀取，(學號 -> 組別, 座位) 必須一致
    let data = std::fs::read(temp_dir.path().join("out/result.csv"))?;
    let rows = read_assignments(&data, ExportFormat::Csv)?;
    let exported: HashMap<String, (String, usize)> = rows
        .into_iter()
        .map(|row| (row.id, (row.group, row.seat)))
        .collect();
    let expected: HashMap<String, (String, usize)> = run
        .outcome
        .allocation
        .assignments()
        .into_iter()
        .map(|a| (a.id, (a.group, a.seat)))
        .collect();
    assert_eq!(exported, expected);

    Ok(())
}

#[test]
fn test_end_to_end_missing_roster_uses_sample() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(Some("does_not_exist.csv"), "result.json", GroupConfig::default());
    let engine = SeatingEngine::new(RosterPipeline::new(LocalStorage::new(temp_dir.path()), config));

    let run = engine.run()?;

    assert!(matches!(run.source, RosterSource::Sample { .. }));
    assert_eq!(run.outcome.allocation.total_assigned(), sample_roster().len());

    let data = std::fs::read(temp_dir.path().join("result.json"))?;
    let rows = read_assignments(&data, ExportFormat::Json)?;
    assert_eq!(rows.len(), 34);

    Ok(())
}

#[test]
fn test_end_to_end_size_mismatch_warns_and_completes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_roster(&temp_dir)?;

    let groups: GroupConfig = ["A", "B", "C", "D", "E", "F"]
        .into_iter()
        .map(|name| GroupSpec::new(name, 5))
        .collect();
    let config = config_for(Some("roster.csv"), "result.tsv", groups);
    let engine = SeatingEngine::new(RosterPipeline::new(LocalStorage::new(temp_dir.path()), config));

    let run = engine.run()?;

    assert!(run.outcome.warnings.contains(&AllocationWarning::ConfigTotalMismatch {
        configured: 30,
        roster: 34,
    }));
    assert_eq!(run.outcome.strategy, AllocationStrategy::Fallback);
    assert!(run.outcome.allocation.groups.iter().all(|g| g.len() == 5));
    assert_eq!(run.outcome.unassigned.len(), 4);

    let data = std::fs::read(temp_dir.path().join("result.tsv"))?;
    let rows = read_assignments(&data, ExportFormat::Tsv)?;
    assert_eq!(rows.len(), 30);

    Ok(())
}

#[test]
fn test_toml_config_drives_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_roster(&temp_dir)?;

    let config = TomlConfig::from_toml_str(
        r#"
[roster]
input_path = "roster.csv"

[output]
path = "seats.csv"

[allocation]
seed = 1

[[groups]]
name = "North"
size = 17

[[groups]]
name = "South"
size = 17
"#,
    )?;
    let engine = SeatingEngine::new(RosterPipeline::new(LocalStorage::new(temp_dir.path()), config));

    let run = engine.run()?;

    let names: Vec<&str> = run.outcome.allocation.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["North", "South"]);
    for group in &run.outcome.allocation.groups {
        // 17 * 22/34 = 11
        assert_eq!(group.count(Category::First), 11);
    }
    assert!(temp_dir.path().join("seats.csv").exists());

    Ok(())
}
