/// Sentinel recorded when no revision can be determined.
pub const UNSET_SHA: &str = "UNSET";

/// Supplies the revision the lockfile is stamped with. Injected so that
/// aggregation does not depend on ambient process state.
pub trait ReleaseShaSource: Send + Sync {
    fn release_sha(&self) -> Option<String>;
}

pub fn release_sha_or_unset(source: &dyn ReleaseShaSource) -> String {
    source
        .release_sha()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UNSET_SHA.to_string())
}

/// Fixed revision, for tests and for callers that already know the sha.
#[derive(Clone, Debug, Default)]
pub struct FixedSha(pub Option<String>);

impl ReleaseShaSource for FixedSha {
    fn release_sha(&self) -> Option<String> {
        self.0.clone()
    }
}
