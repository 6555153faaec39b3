use txkit_types::Hash;

/// Domain-separated Blake2b-256 hasher.
///
/// Each hasher carries a domain tag that is prepended, with a `:` separator,
/// to the hashed bytes. An intent and a signed intent with identical bytes
/// therefore hash differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Compiled intents. The digest is the transaction id.
    pub const INTENT: Self = Self {
        domain: "txkit-intent-v1",
    };
    /// Compiled signed intents. The notary signs this digest.
    pub const SIGNED_INTENT: Self = Self {
        domain: "txkit-signed-intent-v1",
    };
    /// Compiled notarized transactions.
    pub const NOTARIZED_TRANSACTION: Self = Self {
        domain: "txkit-notarized-transaction-v1",
    };
    /// Compiled manifests.
    pub const MANIFEST: Self = Self {
        domain: "txkit-manifest-v1",
    };

    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    pub fn hash(&self, data: &[u8]) -> Hash {
        let mut state = blake2b_simd::Params::new().hash_length(32).to_state();
        state.update(self.domain.as_bytes());
        state.update(b":");
        state.update(data);
        let digest = state.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(digest.as_bytes());
        Hash::from_bytes(out)
    }

    /// Check that `data` hashes to `expected` under this domain.
    pub fn verify(&self, data: &[u8], expected: &Hash) -> bool {
        self.hash(data) == *expected
    }

    /// Blake2b-256 without domain separation, as used for blob references.
    pub fn raw_hash(data: &[u8]) -> Hash {
        Hash::of(data)
    }

    pub fn domain(&self) -> &str {
        self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"compiled intent";
        assert_eq!(ContentHasher::INTENT.hash(data), ContentHasher::INTENT.hash(data));
    }

    #[test]
    fn domains_separate_hashes() {
        let data = b"same bytes";
        let intent = ContentHasher::INTENT.hash(data);
        let signed = ContentHasher::SIGNED_INTENT.hash(data);
        let notarized = ContentHasher::NOTARIZED_TRANSACTION.hash(data);
        assert_ne!(intent, signed);
        assert_ne!(intent, notarized);
        assert_ne!(signed, notarized);
    }

    #[test]
    fn domain_hash_matches_prefixed_raw_hash() {
        let hasher = ContentHasher::new("custom-v1");
        assert_eq!(hasher.hash(b"abc"), ContentHasher::raw_hash(b"custom-v1:abc"));
    }

    #[test]
    fn verify_detects_tampering() {
        let hash = ContentHasher::MANIFEST.hash(b"original");
        assert!(ContentHasher::MANIFEST.verify(b"original", &hash));
        assert!(!ContentHasher::MANIFEST.verify(b"tampered", &hash));
    }
}
