use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::types::Fingerprint;

/// Hex characters of the digest kept in a fingerprint.
pub const DIGEST_WIDTH: usize = 8;

/// Derive the cache fingerprint `"{kind}:{identity}:{digest}"`.
///
/// The digest covers the rendering parameters only. They are sorted by name
/// before hashing, so insertion order never changes the result, and any
/// `username` entry is ignored because the identity already sits in the key.
pub fn build_fingerprint<'a, I>(kind: &str, identity: &str, params: I) -> Fingerprint
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let sorted: BTreeMap<&str, &str> = params.into_iter().filter(|(k, _)| *k != "username").collect();
    // serializing a map of strings cannot fail
    let canonical = serde_json::to_string(&sorted).unwrap_or_default();
    let digest = hex::encode(Sha256::digest(canonical.as_bytes()));
    format!("{kind}:{identity}:{}", &digest[..DIGEST_WIDTH])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_order_does_not_matter() {
        let a = build_fingerprint("stars", "octocat", [("style", "flat"), ("color", "red")]);
        let b = build_fingerprint("stars", "octocat", [("color", "red"), ("style", "flat")]);
        assert_eq!(a, b);
    }

    #[test]
    fn format_is_kind_identity_digest() {
        let fp = build_fingerprint("followers", "octocat", [("style", "flat")]);
        let parts: Vec<_> = fp.split(':').collect();
        assert_eq!(parts[0], "followers");
        assert_eq!(parts[1], "octocat");
        assert_eq!(parts[2].len(), DIGEST_WIDTH);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn identities_and_params_separate_keys() {
        let base = build_fingerprint("stars", "a", [("style", "flat")]);
        assert_ne!(base, build_fingerprint("stars", "b", [("style", "flat")]));
        assert_ne!(base, build_fingerprint("repos", "a", [("style", "flat")]));
        assert_ne!(base, build_fingerprint("stars", "a", [("style", "rounded")]));
        // username in the parameter set is ignored
        assert_eq!(base, build_fingerprint("stars", "a", [("username", "zzz"), ("style", "flat")]));
    }
}
