//! Version information with embedded git metadata.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA (short) at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Build identifier: `{version}+{branch}.{sha}`, with `.dirty` appended
/// for a modified tree, e.g. `0.1.0+main.abc1234`.
///
/// Logged when the CLI starts and carried in [`default_user_agent`].
pub fn version_string() -> String {
    let dirty_suffix = if git_dirty() { ".dirty" } else { "" };
    format!(
        "{PKG_VERSION}+{GIT_BRANCH}.{}{dirty_suffix}",
        &GIT_SHA[..7.min(GIT_SHA.len())]
    )
}

/// `User-Agent` sent when none is configured, e.g. `huginn/0.1.0+main.abc1234`.
pub fn default_user_agent() -> String {
    format!("huginn/{}", version_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_contains_pkg_version() {
        let version = version_string();
        assert!(
            version.starts_with(PKG_VERSION),
            "version should start with pkg version"
        );
    }

    #[test]
    fn version_string_contains_branch() {
        let version = version_string();
        assert!(
            version.contains(GIT_BRANCH),
            "version should contain branch name"
        );
    }

    #[test]
    fn user_agent_carries_build_string() {
        let agent = default_user_agent();
        assert!(agent.starts_with(&format!("huginn/{PKG_VERSION}+")));
        assert_eq!(agent.strip_prefix("huginn/"), Some(version_string().as_str()));
        assert!(!agent.contains(char::is_whitespace));
    }

    #[test]
    fn short_sha_is_at_most_seven_chars() {
        let version = version_string();
        let suffix = version.trim_end_matches(".dirty");
        let sha = suffix.rsplit('.').next().unwrap();
        assert!(sha.len() <= 7, "sha part {sha:?} should be abbreviated");
    }
}
