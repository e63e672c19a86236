use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::model::{Allocation, Assignment, CategoryLabels};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SeatingError};

/// One line of the result table. Column names double as a roster header set,
/// so an exported file can be read back as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "学号")]
    pub id: String,
    #[serde(rename = "姓名")]
    pub name: String,
    #[serde(rename = "性别")]
    pub category: String,
    #[serde(rename = "班级")]
    pub origin: String,
    #[serde(rename = "组别")]
    pub group: String,
    #[serde(rename = "座位号")]
    pub seat: usize,
}

impl From<&ExportRow> for Assignment {
    fn from(row: &ExportRow) -> Self {
        Assignment {
            id: row.id.clone(),
            group: row.group.clone(),
            seat: row.seat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub const EXTENSIONS: [&'static str; 3] = ["csv", "tsv", "json"];

    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("tsv") => Ok(ExportFormat::Tsv),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(SeatingError::ExportError {
                message: format!(
                    "cannot infer output format from '{}' (expected {})",
                    path,
                    Self::EXTENSIONS.join(", ")
                ),
            }),
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Flattens an allocation into rows sorted by (group, seat).
pub fn export_rows(allocation: &Allocation, labels: &CategoryLabels) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = allocation
        .groups
        .iter()
        .flat_map(|group| {
            group.seats.iter().map(move |seat| ExportRow {
                id: seat.record.id.clone(),
                name: seat.record.name.clone(),
                category: labels.display(seat.record.category).to_string(),
                origin: seat.record.origin.clone(),
                group: group.name.clone(),
                seat: seat.number,
            })
        })
        .collect();

    rows.sort_by(|a, b| a.group.cmp(&b.group).then(a.seat.cmp(&b.seat)));
    rows
}

pub fn encode_rows(rows: &[ExportRow], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(rows)?),
        ExportFormat::Csv | ExportFormat::Tsv => {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(format.delimiter())
                .from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            writer.into_inner().map_err(|e| SeatingError::ExportError {
                message: format!("failed to flush table: {}", e),
            })
        }
    }
}

/// Parses a table written by [`encode_rows`].
pub fn read_assignments(data: &[u8], format: ExportFormat) -> Result<Vec<ExportRow>> {
    match format {
        ExportFormat::Json => Ok(serde_json::from_slice(data)?),
        ExportFormat::Csv | ExportFormat::Tsv => {
            let mut reader = csv::ReaderBuilder::new()
                .delimiter(format.delimiter())
                .from_reader(data);
            reader
                .deserialize()
                .collect::<std::result::Result<Vec<ExportRow>, _>>()
                .map_err(SeatingError::from)
        }
    }
}

/// Writes the allocation to `path`, format picked from its extension.
pub fn export<S: Storage>(
    storage: &S,
    allocation: &Allocation,
    labels: &CategoryLabels,
    path: &str,
) -> Result<String> {
    let format = ExportFormat::from_path(path)?;
    let rows = export_rows(allocation, labels);
    let data = encode_rows(&rows, format)?;

    tracing::debug!("Writing {} rows ({} bytes) to {}", rows.len(), data.len(), path);
    storage.write_file(path, &data)?;
    Ok(path.to_string())
}
