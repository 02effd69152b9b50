//! Shop stamp (spec.md §3): `{tier, shopId, policyDigest, blockHash,
//! acceptDecision, reasonCodes, stampDigest, signature}`, bound to the
//! exact `blockHash`/`policyDigest` the kernel is configured with.

use serde::{Deserialize, Serialize};
use serde_json::json;
use trust_canon::digest_value;
use trust_release::CryptoPort;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    T0,
    T1,
    T2,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StampSignature {
    pub sig_kind: String,
    pub key_id: String,
    pub sig_b64: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShopStamp {
    pub tier: Tier,
    pub shop_id: String,
    pub policy_digest: String,
    pub block_hash: String,
    pub accept_decision: bool,
    pub reason_codes: Vec<String>,
    pub stamp_digest: String,
    pub signature: StampSignature,
}

impl ShopStamp {
    /// `digest(canonical(stamp − stampDigest − signature))`, mirroring the
    /// release manifest's `manifestBody` digesting convention.
    pub fn compute_digest(&self) -> String {
        let body = json!({
            "tier": self.tier,
            "shopId": self.shop_id,
            "policyDigest": self.policy_digest,
            "blockHash": self.block_hash,
            "acceptDecision": self.accept_decision,
            "reasonCodes": self.reason_codes,
        });
        digest_value(&body).to_string()
    }

    pub fn digest_is_consistent(&self) -> bool {
        self.compute_digest() == self.stamp_digest
    }

    pub fn signature_verifies(&self, crypto_port: &dyn CryptoPort, key_allowlist: &std::collections::HashSet<String>) -> bool {
        if !key_allowlist.contains(&self.signature.key_id) {
            return false;
        }
        let Ok(digest) = self.stamp_digest.parse::<trust_canon::Digest>() else { return false };
        crypto_port.verify(&self.signature.sig_kind, &self.signature.key_id, digest.as_bytes(), &self.signature.sig_b64)
    }
}
