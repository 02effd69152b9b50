//! `join`, `normalize`, and `checkpointEq` over reason-code arrays
//! (spec.md §4.B), plus the explicit process-wide reason budget handle
//! (spec.md §9: "an explicit handle passed to `normalize`").

use crate::codes;
use crate::reason::ReasonCode;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DEFAULT_MAX_PER_SUBJECT: usize = 32;
pub const DEFAULT_BUDGET: usize = 2048;

/// `join(a,b)`: union of two reason-code arrays, deduplicated and sorted.
pub fn join(a: &[ReasonCode], b: &[ReasonCode]) -> Vec<ReasonCode> {
    let mut merged: Vec<ReasonCode> = a.iter().chain(b.iter()).cloned().collect();
    sort_dedup(&mut merged);
    merged
}

/// `checkpointEq(expected, observed, code)`: `[code]` iff unequal, else `[]`.
pub fn checkpoint_eq<T: PartialEq>(expected: &T, observed: &T, code: &str) -> Vec<ReasonCode> {
    if expected == observed {
        Vec::new()
    } else {
        vec![ReasonCode::new(code)]
    }
}

/// Process-wide reason budget: an explicit handle, never a global/static.
/// Default capacity mirrors spec.md §3's "process-wide budget: 2048".
pub struct ReasonBudget {
    used: AtomicUsize,
    limit: usize,
}

impl Default for ReasonBudget {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}

impl ReasonBudget {
    pub fn new(limit: usize) -> Self {
        Self { used: AtomicUsize::new(0), limit }
    }

    pub fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used())
    }

    fn consume(&self, n: usize) {
        self.used.fetch_add(n, Ordering::SeqCst);
    }
}

pub struct NormalizeOptions<'a> {
    pub max_per_subject: usize,
    pub subject: &'a str,
    pub locator: &'a str,
}

impl<'a> NormalizeOptions<'a> {
    pub fn new(subject: &'a str, locator: &'a str) -> Self {
        Self { max_per_subject: DEFAULT_MAX_PER_SUBJECT, subject, locator }
    }
}

/// `normalize(xs, {maxPerSubject, budget, subject, locator})` from
/// spec.md §4.B: filters meta codes, sorts, applies the per-subject cap and
/// the global budget, truncating and appending
/// `TRUST_REASONS_TRUNCATED:kept=K,dropped=D` on overflow.
pub fn normalize(xs: &[ReasonCode], opts: &NormalizeOptions<'_>, budget: &ReasonBudget) -> Vec<ReasonCode> {
    let mut filtered: Vec<ReasonCode> = xs.iter().filter(|r| r.code() != codes::TRUST_REASONS_TRUNCATED_PREFIX).cloned().collect();
    sort_dedup(&mut filtered);

    if filtered.len() > opts.max_per_subject {
        filtered.truncate(opts.max_per_subject);
    }

    let remaining_budget = budget.remaining();
    if filtered.len() > remaining_budget {
        let kept = remaining_budget.saturating_sub(1);
        let dropped = filtered.len() - kept;
        filtered.truncate(kept);
        filtered.push(ReasonCode::new(format!("{}:kept={kept},dropped={dropped}", codes::TRUST_REASONS_TRUNCATED_PREFIX)));
        sort_dedup(&mut filtered);
    }

    budget.consume(filtered.len());
    let _ = opts.subject;
    let _ = opts.locator;
    filtered
}

fn sort_dedup(xs: &mut Vec<ReasonCode>) {
    xs.sort();
    xs.dedup();
}
