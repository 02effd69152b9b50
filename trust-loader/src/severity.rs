//! Incident severity classification and the loader's `incidentSummary`
//! (spec.md §6 persisted state): produced on every load, zeroed when no
//! incident occurred.

use serde::Serialize;
use std::collections::BTreeMap;
use trust_algebra::codes;
use trust_store::Incident;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Deny,
    Quarantine,
}

/// An incident recovered from tamper (`ARTIFACT_RECOVERED` present) is a
/// `Warn`: the read still succeeded. One that left the load quarantined is
/// `Quarantine`; any other failure-carrying incident is `Deny`.
pub fn classify(incident: &Incident, quarantined: bool) -> Severity {
    let recovered = incident.reason_codes.iter().any(|r| r.code() == codes::ARTIFACT_RECOVERED);
    if recovered {
        Severity::Warn
    } else if quarantined {
        Severity::Quarantine
    } else {
        Severity::Deny
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct IncidentSummary {
    pub total: u64,
    pub info: u64,
    pub warn: u64,
    pub deny: u64,
    pub quarantine: u64,
    pub kinds: BTreeMap<String, u64>,
}

impl IncidentSummary {
    /// Builds a summary from this load's incidents, present even when the
    /// list is empty (spec.md §4.J step 7).
    pub fn from_incidents(incidents: &[(Incident, Severity)]) -> Self {
        let mut summary = IncidentSummary::default();
        for (incident, severity) in incidents {
            summary.total += 1;
            match severity {
                Severity::Info => summary.info += 1,
                Severity::Warn => summary.warn += 1,
                Severity::Deny => summary.deny += 1,
                Severity::Quarantine => summary.quarantine += 1,
            }
            *summary.kinds.entry(incident.kind.clone()).or_insert(0) += 1;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trust_algebra::ReasonCode;

    fn incident(reasons: Vec<&str>) -> Incident {
        Incident { kind: "artifact.mismatch".to_string(), plan_digest: None, block_hash: None, reason_codes: reasons.into_iter().map(ReasonCode::new).collect(), seq: 1 }
    }

    #[test]
    fn recovered_incident_is_warn() {
        let i = incident(vec![codes::ARTIFACT_DIGEST_MISMATCH, codes::ARTIFACT_RECOVERED]);
        assert_eq!(classify(&i, false), Severity::Warn);
    }

    #[test]
    fn unrecovered_quarantined_incident_is_quarantine() {
        let i = incident(vec![codes::ARTIFACT_DIGEST_MISMATCH]);
        assert_eq!(classify(&i, true), Severity::Quarantine);
    }

    #[test]
    fn unrecovered_non_quarantined_incident_is_deny() {
        let i = incident(vec![codes::ARTIFACT_DIGEST_MISMATCH]);
        assert_eq!(classify(&i, false), Severity::Deny);
    }

    #[test]
    fn empty_incident_list_yields_zeroed_summary() {
        let summary = IncidentSummary::from_incidents(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.kinds.is_empty());
    }

    #[test]
    fn summary_counts_by_severity_and_kind() {
        let incidents = vec![(incident(vec![codes::ARTIFACT_DIGEST_MISMATCH, codes::ARTIFACT_RECOVERED]), Severity::Warn), (incident(vec![codes::ARTIFACT_DIGEST_MISMATCH]), Severity::Quarantine)];
        let summary = IncidentSummary::from_incidents(&incidents);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.warn, 1);
        assert_eq!(summary.quarantine, 1);
        assert_eq!(summary.kinds["artifact.mismatch"], 2);
    }
}
