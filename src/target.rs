//! Milestone targets and the per-request submission figures derived from them.
//!
//! A campaign's displayed goal moves on to the next milestone once submissions
//! reach 90% of the current one, so the bar never sits visibly full.

/// Ascending goal thresholds a campaign can be aiming for.
pub const MILESTONES: [u64; 53] = [
    500, 1_000, 5_000, 10_000, 15_000, 25_000, 30_000, 40_000, 50_000, 60_000, 70_000, 80_000,
    90_000, 100_000, 120_000, 150_000, 200_000, 250_000, 300_000, 350_000, 400_000, 450_000,
    500_000, 550_000, 600_000, 650_000, 700_000, 750_000, 800_000, 850_000, 900_000, 950_000,
    1_000_000, 1_100_000, 1_200_000, 1_300_000, 1_400_000, 1_500_000, 1_600_000, 1_700_000,
    1_800_000, 1_900_000, 2_000_000, 2_100_000, 2_200_000, 2_300_000, 2_400_000, 2_500_000,
    2_600_000, 2_700_000, 2_800_000, 2_900_000, 3_000_000,
];

/// Whether `submissions` has reached 90% of `milestone`. Integer-only so the
/// boundary (e.g. 450 for 500) is exact.
fn reached(submissions: u64, milestone: u64) -> bool {
    submissions.saturating_mul(10) >= milestone * 9
}

/// Next milestone goal for the given submission count.
///
/// - below 90% of the first milestone: the first milestone
/// - at or above 90% of the last milestone: the last milestone
/// - otherwise the milestone after the highest one whose 90% mark was reached
pub fn calculate_target(submissions: u64) -> u64 {
    let first = MILESTONES[0];
    let last = MILESTONES[MILESTONES.len() - 1];

    if !reached(submissions, first) {
        return first;
    }
    if reached(submissions, last) {
        return last;
    }

    MILESTONES
        .windows(2)
        .find(|pair| reached(submissions, pair[0]) && !reached(submissions, pair[1]))
        .map(|pair| pair[1])
        .unwrap_or(last)
}

/// Submission figures available to the text template and the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionState {
    pub total: u64,
    pub target: u64,
    /// `target - total`, never negative
    pub needed: u64,
    /// `total / target` as a whole percentage, clamped to 100
    pub percentage: u8,
}

impl SubmissionState {
    pub fn from_total(total: u64) -> Self {
        let target = calculate_target(total);
        let ratio = total as f64 / target as f64;
        let percentage = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;
        Self {
            total,
            target,
            needed: target.saturating_sub(total),
            percentage,
        }
    }

    /// Look up a field by its template placeholder name.
    pub fn field(&self, name: &str) -> Option<u64> {
        match name {
            "total" => Some(self.total),
            "target" => Some(self.target),
            "needed" => Some(self.needed),
            "percentage" => Some(u64::from(self.percentage)),
            _ => None,
        }
    }
}
