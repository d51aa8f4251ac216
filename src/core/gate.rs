//! Digest comparison deciding whether a reload is due.

use crate::digest::ContentDigest;

/// Remembers the last digest that was successfully announced.
///
/// The gate never advances on its own: the watch loop calls [`commit`] only
/// after the reload endpoint accepted the notification, so a failed reload is
/// retried against the same baseline on the next cycle.
///
/// [`commit`]: ChangeGate::commit
#[derive(Debug, Clone, Default)]
pub struct ChangeGate {
    last_digest: Option<ContentDigest>,
}

impl ChangeGate {
    /// Create a gate with no baseline; the first digest always passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `digest` differs from the committed baseline.
    pub fn should_notify(&self, digest: &ContentDigest) -> bool {
        self.last_digest.as_ref() != Some(digest)
    }

    /// Record `digest` as the new baseline.
    pub fn commit(&mut self, digest: ContentDigest) {
        self.last_digest = Some(digest);
    }

    /// The committed baseline, if any.
    pub fn last_digest(&self) -> Option<&ContentDigest> {
        self.last_digest.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_digest_passes() {
        let gate = ChangeGate::new();
        assert!(gate.should_notify(&ContentDigest::from([1; 32])));
        assert!(gate.last_digest().is_none());
    }

    #[test]
    fn test_committed_digest_is_suppressed() {
        let mut gate = ChangeGate::new();
        let digest = ContentDigest::from([1; 32]);

        gate.commit(digest);
        assert!(!gate.should_notify(&digest));
        assert!(gate.should_notify(&ContentDigest::from([2; 32])));
    }

    #[test]
    fn test_should_notify_does_not_advance() {
        let gate = ChangeGate::new();
        let digest = ContentDigest::from([7; 32]);

        assert!(gate.should_notify(&digest));
        assert!(gate.should_notify(&digest));
        assert!(gate.last_digest().is_none());
    }
}
