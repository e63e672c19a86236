//! Group allocation: proportional pass, uniform fallback, seat shuffling.
//!
//! The allocator never fails. Size mismatches are reported through
//! [`AllocationWarning`] and the caller always receives a grouping.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::core::bucket::CategoryBucket;
use crate::domain::model::{
    Allocation, AllocationOutcome, AllocationStrategy, AllocationWarning, Category, GroupAllocation,
    GroupConfig, Record, Seat,
};

/// Seeded generator when `seed` is set, entropy-seeded otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Per-category counts a group of `size` should receive.
///
/// Each category gets at least one slot; when rounding overshoots the group,
/// the category with the larger ratio is clamped to `size - 1` and the other
/// takes the remainder. Ties clamp the second category.
pub fn ideal_counts(size: usize, ratio_first: f64, ratio_second: f64) -> (usize, usize) {
    let mut first = ideal_count(size, ratio_first);
    let mut second = ideal_count(size, ratio_second);

    if first + second > size {
        if ratio_first > ratio_second {
            first = first.min(size.saturating_sub(1));
            second = size - first;
        } else {
            second = second.min(size.saturating_sub(1));
            first = size - second;
        }
    }

    (first, second)
}

// 四捨六入五成雙，與原本名單工具的取整方式一致
fn ideal_count(size: usize, ratio: f64) -> usize {
    ((size as f64 * ratio).round_ties_even() as usize).max(1)
}

#[derive(Debug, Clone)]
pub struct GroupAllocator {
    config: GroupConfig,
}

impl GroupAllocator {
    pub fn new(config: GroupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn allocate<R: Rng + ?Sized>(&self, records: &[Record], rng: &mut R) -> AllocationOutcome {
        let mut warnings = Vec::new();

        let configured = self.config.total_size();
        if configured != records.len() {
            tracing::warn!(
                "⚠️ Group sizes total {} but roster has {} records",
                configured,
                records.len()
            );
            warnings.push(AllocationWarning::ConfigTotalMismatch {
                configured,
                roster: records.len(),
            });
        }

        let proportional = self.proportional_pass(records, rng);
        let (groups, strategy) = if self.verify(&proportional, records.len()) {
            tracing::debug!("Proportional pass filled every group");
            (proportional, AllocationStrategy::Proportional)
        } else {
            tracing::info!("🔀 Proportional pass did not match configured sizes, reshuffling");
            (self.fallback_pass(records.len(), rng), AllocationStrategy::Fallback)
        };

        let allocation = self.seat(groups, records, rng);

        for group in &allocation.groups {
            if group.len() != group.target_size {
                tracing::warn!(
                    "⚠️ Group {} has {} members, configured {}",
                    group.name,
                    group.len(),
                    group.target_size
                );
                warnings.push(AllocationWarning::GroupSizeMismatch {
                    group: group.name.clone(),
                    expected: group.target_size,
                    actual: group.len(),
                });
            }
        }

        let assigned = allocation.total_assigned();
        if assigned != records.len() {
            tracing::warn!("⚠️ Assigned {} of {} records", assigned, records.len());
            warnings.push(AllocationWarning::TotalAssignedMismatch {
                assigned,
                expected: records.len(),
            });
        }

        let unassigned = unassigned_records(&allocation, records);

        AllocationOutcome {
            allocation,
            strategy,
            warnings,
            unassigned,
        }
    }

    /// Phase 1: draw from two shuffled category buckets in proportion.
    fn proportional_pass<R: Rng + ?Sized>(&self, records: &[Record], rng: &mut R) -> Vec<Vec<usize>> {
        let mut first: Vec<usize> = Vec::new();
        let mut second: Vec<usize> = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match record.category {
                Category::First => first.push(index),
                Category::Second => second.push(index),
            }
        }
        first.shuffle(rng);
        second.shuffle(rng);

        let total = records.len();
        let (ratio_first, ratio_second) = if total > 0 {
            (
                first.len() as f64 / total as f64,
                second.len() as f64 / total as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let mut first = CategoryBucket::new(first);
        let mut second = CategoryBucket::new(second);
        let mut groups = Vec::with_capacity(self.config.len());

        for spec in &self.config {
            let (want_first, want_second) = ideal_counts(spec.size, ratio_first, ratio_second);
            let mut members = Vec::with_capacity(spec.size);

            draw(&mut first, want_first.min(spec.size - members.len()), &mut members);
            draw(&mut second, want_second.min(spec.size - members.len()), &mut members);

            // 不足的名額先由第一類補，再由第二類補
            members.extend_from_slice(first.take_up_to(spec.size - members.len()));
            members.extend_from_slice(second.take_up_to(spec.size - members.len()));

            tracing::debug!(
                "Group {}: ideal {}/{}, drew {} of {}",
                spec.name,
                want_first,
                want_second,
                members.len(),
                spec.size
            );
            groups.push(members);
        }

        groups
    }

    fn verify(&self, groups: &[Vec<usize>], total_records: usize) -> bool {
        let sizes_match = self
            .config
            .iter()
            .zip(groups)
            .all(|(spec, members)| members.len() == spec.size);
        let assigned: usize = groups.iter().map(Vec::len).sum();
        sizes_match && assigned == total_records
    }

    /// Phase 2: one uniform shuffle, sliced into consecutive chunks.
    ///
    /// When the configured sizes exceed the roster, trailing groups get a
    /// short or empty slice.
    fn fallback_pass<R: Rng + ?Sized>(&self, total_records: usize, rng: &mut R) -> Vec<Vec<usize>> {
        let mut pool: Vec<usize> = (0..total_records).collect();
        pool.shuffle(rng);

        let mut start = 0;
        self.config
            .iter()
            .map(|spec| {
                let end = (start + spec.size).min(pool.len());
                let chunk = pool[start..end].to_vec();
                start = end;
                chunk
            })
            .collect()
    }

    fn seat<R: Rng + ?Sized>(
        &self,
        groups: Vec<Vec<usize>>,
        records: &[Record],
        rng: &mut R,
    ) -> Allocation {
        let groups = self
            .config
            .iter()
            .zip(groups)
            .map(|(spec, mut members)| {
                members.shuffle(rng);
                GroupAllocation {
                    name: spec.name.clone(),
                    target_size: spec.size,
                    seats: members
                        .into_iter()
                        .enumerate()
                        .map(|(position, index)| Seat {
                            number: position + 1,
                            record: records[index].clone(),
                        })
                        .collect(),
                }
            })
            .collect();

        Allocation { groups }
    }
}

fn draw(bucket: &mut CategoryBucket, want: usize, members: &mut Vec<usize>) {
    match bucket.take(want) {
        Ok(indices) => members.extend_from_slice(indices),
        Err(exhausted) => {
            tracing::debug!("{}", exhausted);
            members.extend_from_slice(bucket.take_up_to(exhausted.remaining));
        }
    }
}

fn unassigned_records(allocation: &Allocation, records: &[Record]) -> Vec<Record> {
    let mut remaining: Vec<&Record> = records.iter().collect();
    for seat in allocation.groups.iter().flat_map(|g| &g.seats) {
        if let Some(position) = remaining.iter().position(|r| *r == &seat.record) {
            remaining.swap_remove(position);
        }
    }
    remaining.into_iter().cloned().collect()
}

/// Allocates `records` into `config` using the given randomness source.
pub fn allocate<R: Rng + ?Sized>(
    records: &[Record],
    config: &GroupConfig,
    rng: &mut R,
) -> AllocationOutcome {
    GroupAllocator::new(config.clone()).allocate(records, rng)
}
