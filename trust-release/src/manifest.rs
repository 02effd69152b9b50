//! Release manifest shape (spec.md §3): `{manifestBody, signatures[]}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManifestBody {
    pub release_id: String,
    pub plan_digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_digest: Option<String>,
    pub blocks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_digest: Option<String>,
    /// Any additional fields callers round-trip through the manifest;
    /// folded into the privacy lint and the canonical digest but not
    /// otherwise interpreted here.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManifestSignature {
    pub sig_kind: String,
    pub key_id: String,
    pub sig_b64: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReleaseManifest {
    pub manifest_body: ManifestBody,
    pub signatures: Vec<ManifestSignature>,
}
