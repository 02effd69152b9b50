//! Decision lattice and strict-loader verdict derivation (spec.md §3).

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Yes,
    Maybe,
    No,
}

/// `join(a,b)` on the decision lattice: `NO` absorbs, `YES ⊔ YES = YES`,
/// everything else is `MAYBE`.
pub fn join_decision(a: Decision, b: Decision) -> Decision {
    use Decision::*;
    match (a, b) {
        (No, _) | (_, No) => No,
        (Yes, Yes) => Yes,
        _ => Maybe,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Allow,
    Deny,
    Quarantine,
}

/// Derives the strict-loader verdict from spec.md §3: `QUARANTINE` dominates;
/// else `DENY` unless both verify and execute yielded `ALLOW`.
pub fn derive_verdict(quarantined: bool, verify_allow: bool, execute_allow: bool) -> Verdict {
    if quarantined {
        Verdict::Quarantine
    } else if verify_allow && execute_allow {
        Verdict::Allow
    } else {
        Verdict::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Decision::*;

    #[test]
    fn no_absorbs() {
        assert_eq!(join_decision(No, Yes), No);
        assert_eq!(join_decision(Maybe, No), No);
        assert_eq!(join_decision(No, No), No);
    }

    #[test]
    fn yes_join_yes_is_yes() {
        assert_eq!(join_decision(Yes, Yes), Yes);
    }

    #[test]
    fn mixed_without_no_is_maybe() {
        assert_eq!(join_decision(Yes, Maybe), Maybe);
        assert_eq!(join_decision(Maybe, Maybe), Maybe);
    }

    #[test]
    fn commutative_and_associative_p3() {
        let values = [Yes, Maybe, No];
        for &a in &values {
            for &b in &values {
                assert_eq!(join_decision(a, b), join_decision(b, a));
                for &c in &values {
                    assert_eq!(join_decision(join_decision(a, b), c), join_decision(a, join_decision(b, c)));
                }
            }
        }
    }

    #[test]
    fn verdict_quarantine_dominates() {
        assert_eq!(derive_verdict(true, true, true), Verdict::Quarantine);
        assert_eq!(derive_verdict(true, false, false), Verdict::Quarantine);
    }

    #[test]
    fn verdict_allow_requires_both() {
        assert_eq!(derive_verdict(false, true, true), Verdict::Allow);
        assert_eq!(derive_verdict(false, true, false), Verdict::Deny);
        assert_eq!(derive_verdict(false, false, true), Verdict::Deny);
    }
}
