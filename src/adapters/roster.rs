use std::collections::HashSet;
use std::path::Path;

use crate::domain::model::{Category, CategoryLabels, LoadedRoster, Record, RosterSource};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SeatingError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Accepted (id, name, category, origin) header sets, tried in order.
const HEADER_SYNONYMS: [[&str; 4]; 4] = [
    ["学号", "姓名", "性别", "班级"],
    ["student_id", "name", "gender", "class"],
    ["id", "name", "sex", "class"],
    ["序号", "姓名", "性别", "班级"],
];

const ID_LABELS: [&str; 4] = ["学号", "序号", "student_id", "id"];
const NAME_LABELS: [&str; 2] = ["姓名", "name"];
const CATEGORY_LABELS: [&str; 3] = ["性别", "gender", "sex"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Named([usize; 4]),
    Positional,
}

// "学   号" 和 "学号" 視為同一欄
fn normalize_label(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn is_label(value: &str, labels: &[&str]) -> bool {
    let value = normalize_label(value);
    labels.iter().any(|label| label.eq_ignore_ascii_case(&value))
}

fn find_layout(headers: &[String]) -> Layout {
    for synonyms in HEADER_SYNONYMS {
        let mut columns = [0usize; 4];
        let found = synonyms.iter().zip(columns.iter_mut()).all(|(wanted, slot)| {
            match headers.iter().position(|h| h.eq_ignore_ascii_case(wanted)) {
                Some(index) => {
                    *slot = index;
                    true
                }
                None => false,
            }
        });
        if found {
            tracing::debug!("Matched roster columns {:?} at {:?}", synonyms, columns);
            return Layout::Named(columns);
        }
    }
    Layout::Positional
}

pub fn delimiter_for(path: &str) -> u8 {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Parses a delimited roster table.
///
/// Header rows repeated inside the data and rows without a name or
/// category are dropped. Rows whose category matches neither label list
/// are dropped with a warning. Returns an error when nothing usable remains.
pub fn parse_roster(data: &[u8], delimiter: u8, labels: &CategoryLabels) -> Result<Vec<Record>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_label).collect();
    tracing::debug!("Roster headers: {:?}", headers);

    let layout = find_layout(&headers);
    if layout == Layout::Positional {
        tracing::info!("No known header set found, reading columns by position");
    }

    let mut records = Vec::new();
    for (row_index, row) in reader.records().enumerate() {
        let row = row?;

        let columns = match layout {
            Layout::Named(columns) => columns,
            Layout::Positional => {
                if row_index == 0 || row.len() < 4 {
                    continue;
                }
                [0, 1, 2, 3]
            }
        };

        let cell = |column: usize| row.get(column).unwrap_or("").trim();
        let (id, name, category, origin) = (cell(columns[0]), cell(columns[1]), cell(columns[2]), cell(columns[3]));

        if matches!(layout, Layout::Named(_)) && is_label(id, &ID_LABELS) {
            continue;
        }
        if name.is_empty()
            || is_label(name, &NAME_LABELS)
            || category.is_empty()
            || is_label(category, &CATEGORY_LABELS)
        {
            tracing::debug!("Skipping roster row {}: {:?}", row_index + 1, row);
            continue;
        }

        match labels.parse(category) {
            Some(category) => records.push(Record::new(id, name, category, origin)),
            None => tracing::warn!(
                "⚠️ Skipping {} ({}): unknown category label '{}'",
                name,
                id,
                category
            ),
        }
    }

    if records.is_empty() {
        return Err(SeatingError::RosterError {
            message: "no usable rows in roster table".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id.as_str()) {
            tracing::warn!("⚠️ Duplicate identifier in roster: {}", record.id);
        }
    }

    Ok(records)
}

/// Reads the roster at `path`, substituting [`sample_roster`] on any failure.
pub fn load_roster<S: Storage>(storage: &S, path: Option<&str>, labels: &CategoryLabels) -> LoadedRoster {
    let Some(path) = path else {
        tracing::info!("No roster path configured, using sample roster");
        return LoadedRoster {
            records: sample_roster(),
            source: RosterSource::Sample {
                reason: "no input path configured".to_string(),
            },
        };
    };

    let parsed = storage
        .read_file(path)
        .and_then(|data| parse_roster(&data, delimiter_for(path), labels));

    match parsed {
        Ok(records) => {
            tracing::info!("📥 Read {} records from {}", records.len(), path);
            LoadedRoster {
                records,
                source: RosterSource::File(path.to_string()),
            }
        }
        Err(e) => {
            tracing::warn!("❌ Failed to read roster {}: {}", path, e);
            tracing::warn!("💡 {}", e.recovery_suggestion());
            tracing::info!("Falling back to sample roster");
            LoadedRoster {
                records: sample_roster(),
                source: RosterSource::Sample {
                    reason: e.to_string(),
                },
            }
        }
    }
}

/// Built-in 34-record roster: 24 from 物流241, 10 from 物流242.
pub fn sample_roster() -> Vec<Record> {
    use Category::{First as M, Second as F};

    const ROWS: [(&str, &str, Category, &str); 34] = [
        ("2407070101", "张三", M, "物流241"),
        ("2407070102", "李四", M, "物流241"),
        ("2407070103", "王五", M, "物流241"),
        ("2407070104", "赵六", M, "物流241"),
        ("2407070107", "钱七", M, "物流241"),
        ("2407070108", "孙八", M, "物流241"),
        ("2407070109", "周九", M, "物流241"),
        ("2407070111", "吴十", M, "物流241"),
        ("2407070112", "郑十一", F, "物流241"),
        ("2407070113", "王十二", F, "物流241"),
        ("2407070114", "李十三", F, "物流241"),
        ("2407070115", "赵十四", F, "物流241"),
        ("2407070116", "张十五", F, "物流241"),
        ("2407070118", "陈十六", F, "物流241"),
        ("2407070119", "杨十七", F, "物流241"),
        ("2407070120", "黄十八", F, "物流241"),
        ("2407070121", "周十九", F, "物流241"),
        ("2407070122", "吴二十", F, "物流241"),
        ("2407070123", "郑二一", M, "物流241"),
        ("2407070124", "王二二", M, "物流241"),
        ("2407070125", "李二三", M, "物流241"),
        ("2407070126", "赵二四", F, "物流241"),
        ("2407070127", "张二五", M, "物流241"),
        ("2407070128", "陈二六", F, "物流241"),
        ("2407070203", "杨二七", F, "物流242"),
        ("2407070207", "黄二八", F, "物流242"),
        ("2407070210", "周二九", F, "物流242"),
        ("2407070215", "吴三十", M, "物流242"),
        ("2407070217", "郑三一", M, "物流242"),
        ("2407070221", "王三二", M, "物流242"),
        ("2407070222", "李三三", F, "物流242"),
        ("2407070224", "赵三四", F, "物流242"),
        ("2407070226", "张三五", M, "物流242"),
        ("2407070227", "陈三六", M, "物流242"),
    ];

    ROWS.iter()
        .map(|(id, name, category, origin)| Record::new(*id, *name, *category, *origin))
        .collect()
}
