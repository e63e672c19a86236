use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{Result, SeatingError};

/// The binary attribute balanced across groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    First,
    Second,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::First, Category::Second];
}

/// One roster entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub origin: String,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            origin: origin.into(),
        }
    }
}

/// Labels that map a free-text table cell onto a [`Category`].
///
/// The first label of each list is the one written back on export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabels {
    pub first: Vec<String>,
    pub second: Vec<String>,
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self {
            first: vec!["男".to_string(), "M".to_string(), "male".to_string()],
            second: vec!["女".to_string(), "F".to_string(), "female".to_string()],
        }
    }
}

impl CategoryLabels {
    pub fn labels(&self, category: Category) -> &[String] {
        match category {
            Category::First => &self.first,
            Category::Second => &self.second,
        }
    }

    /// ASCII labels compare case-insensitively; anything else must match exactly.
    pub fn parse(&self, raw: &str) -> Option<Category> {
        let raw = raw.trim();
        Category::ALL.into_iter().find(|category| {
            self.labels(*category)
                .iter()
                .any(|label| label == raw || label.eq_ignore_ascii_case(raw))
        })
    }

    pub fn display(&self, category: Category) -> &str {
        self.labels(category)
            .first()
            .map(String::as_str)
            .unwrap_or(match category {
                Category::First => "A",
                Category::Second => "B",
            })
    }
}

/// A named group and its target size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub size: usize,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Parses the `NAME=SIZE` form used on the command line.
impl FromStr for GroupSpec {
    type Err = SeatingError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, size) = s.split_once('=').ok_or_else(|| SeatingError::InvalidConfigValueError {
            field: "groups".to_string(),
            value: s.to_string(),
            reason: "Expected NAME=SIZE".to_string(),
        })?;

        let size = size
            .trim()
            .parse::<usize>()
            .map_err(|e| SeatingError::InvalidConfigValueError {
                field: "groups".to_string(),
                value: s.to_string(),
                reason: format!("Invalid group size: {}", e),
            })?;

        Ok(GroupSpec::new(name.trim(), size))
    }
}

/// Group universe in declaration order. Iteration order drives both passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupConfig {
    groups: Vec<GroupSpec>,
}

impl GroupConfig {
    pub fn new(groups: Vec<GroupSpec>) -> Self {
        Self { groups }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupSpec> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_size(&self) -> usize {
        self.groups.iter().map(|g| g.size).sum()
    }

    pub fn size_of(&self, name: &str) -> Option<usize> {
        self.groups.iter().find(|g| g.name == name).map(|g| g.size)
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self::new(vec![
            GroupSpec::new("A", 6),
            GroupSpec::new("B", 6),
            GroupSpec::new("C", 6),
            GroupSpec::new("D", 5),
            GroupSpec::new("E", 6),
            GroupSpec::new("F", 5),
        ])
    }
}

impl FromIterator<GroupSpec> for GroupConfig {
    fn from_iter<T: IntoIterator<Item = GroupSpec>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GroupConfig {
    type Item = &'a GroupSpec;
    type IntoIter = std::slice::Iter<'a, GroupSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group and seat assigned to one record, joined back to it by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub group: String,
    pub seat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub number: usize,
    pub record: Record,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAllocation {
    pub name: String,
    pub target_size: usize,
    /// Ordered by seat number.
    pub seats: Vec<Seat>,
}

impl GroupAllocation {
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn count(&self, category: Category) -> usize {
        self.seats
            .iter()
            .filter(|seat| seat.record.category == category)
            .count()
    }
}

/// Group name to seated members, in group declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    pub groups: Vec<GroupAllocation>,
}

impl Allocation {
    pub fn get(&self, name: &str) -> Option<&GroupAllocation> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn total_assigned(&self) -> usize {
        self.groups.iter().map(GroupAllocation::len).sum()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.seats.iter().map(move |seat| Assignment {
                    id: seat.record.id.clone(),
                    group: group.name.clone(),
                    seat: seat.number,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllocationStrategy {
    /// Ratio-aware pass succeeded.
    Proportional,
    /// Uniform shuffle chunked by group size.
    Fallback,
}

/// Advisory diagnostics. Allocation never fails; it reports these instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AllocationWarning {
    ConfigTotalMismatch { configured: usize, roster: usize },
    GroupSizeMismatch { group: String, expected: usize, actual: usize },
    TotalAssignedMismatch { assigned: usize, expected: usize },
}

impl fmt::Display for AllocationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationWarning::ConfigTotalMismatch { configured, roster } => write!(
                f,
                "configured group sizes total {} but the roster has {} records",
                configured, roster
            ),
            AllocationWarning::GroupSizeMismatch {
                group,
                expected,
                actual,
            } => write!(
                f,
                "group {} has {} members, configured size is {}",
                group, actual, expected
            ),
            AllocationWarning::TotalAssignedMismatch { assigned, expected } => write!(
                f,
                "{} records assigned out of {}",
                assigned, expected
            ),
        }
    }
}

/// Where the roster handed to the allocator came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    File(String),
    Sample { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRoster {
    pub records: Vec<Record>,
    pub source: RosterSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub allocation: Allocation,
    pub strategy: AllocationStrategy,
    pub warnings: Vec<AllocationWarning>,
    /// Records that ended up in no group (only when sizes don't reconcile).
    pub unassigned: Vec<Record>,
}
