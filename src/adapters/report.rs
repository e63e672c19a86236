use std::fmt::Write;

use crate::domain::model::{AllocationOutcome, Category, CategoryLabels, GroupAllocation};

const RULE_WIDTH: usize = 80;

/// Renders the console summary: per-group category counts, members by seat,
/// grand totals, then any allocation warnings.
pub fn render(outcome: &AllocationOutcome, labels: &CategoryLabels) -> String {
    let mut out = String::new();
    let first_label = labels.display(Category::First);
    let second_label = labels.display(Category::Second);

    let _ = writeln!(out, "学生分组和座位排号结果：");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    let mut groups: Vec<&GroupAllocation> = outcome.allocation.groups.iter().collect();
    groups.sort_by(|a, b| a.name.cmp(&b.name));

    let (mut total_first, mut total_second) = (0, 0);
    for group in groups {
        let first = group.count(Category::First);
        let second = group.count(Category::Second);
        total_first += first;
        total_second += second;

        let _ = writeln!(out, "组 {} ({}人):", group.name, group.len());
        let _ = writeln!(
            out,
            "  {}: {}人, {}: {}人",
            first_label, first, second_label, second
        );
        for seat in &group.seats {
            let _ = writeln!(
                out,
                "  座位{}: {} ({}, {})",
                seat.number,
                seat.record.name,
                labels.display(seat.record.category),
                seat.record.origin
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "总人数: {}人，其中{} {}人，{} {}人",
        total_first + total_second,
        first_label,
        total_first,
        second_label,
        total_second
    );
    if !outcome.unassigned.is_empty() {
        let _ = writeln!(out, "未分配: {}人", outcome.unassigned.len());
    }
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    for warning in &outcome.warnings {
        let _ = writeln!(out, "⚠️ {}", warning);
    }

    out
}
