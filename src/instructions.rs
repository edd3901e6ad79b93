//! The task message handed to the assistant.
//!
//! The text is bundled into the binary at build time via `include_str!`; a
//! project can replace it with its own file through the `instructions`
//! config key.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::Path;

/// The INSTRUCTIONS.md content bundled at build time.
pub const BUNDLED: &str = include_str!("../INSTRUCTIONS.md");

/// Resolve the instruction text: the override file (relative to `root`) when
/// configured, the bundled text otherwise.
pub fn load(root: &Path, override_path: Option<&Path>) -> Result<Cow<'static, str>> {
    let Some(rel) = override_path else {
        return Ok(Cow::Borrowed(BUNDLED));
    };
    let path = root.join(rel);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read instructions {}", path.display()))?;
    if text.trim().is_empty() {
        anyhow::bail!("instructions file is empty: {}", path.display());
    }
    Ok(Cow::Owned(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn bundled_mentions_all_three_tiers() {
        assert!(BUNDLED.contains("README essentials"));
        assert!(BUNDLED.contains("FAQ"));
        assert!(BUNDLED.contains("Source code comments"));
    }

    #[test]
    fn no_override_is_bundled() {
        let dir = TempDir::new().unwrap();
        let text = load(dir.path(), None).unwrap();
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, BUNDLED);
    }

    #[test]
    fn override_is_read_relative_to_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/improve.md"), "Fix one typo.\n").unwrap();
        let text = load(dir.path(), Some(Path::new("docs/improve.md"))).unwrap();
        assert_eq!(text, "Fix one typo.\n");
    }

    #[test]
    fn missing_override_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load(dir.path(), Some(Path::new("nope.md"))).unwrap_err();
        assert!(err.to_string().contains("failed to read instructions"));
    }

    #[test]
    fn blank_override_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blank.md"), "  \n").unwrap();
        assert!(load(dir.path(), Some(Path::new("blank.md"))).is_err());
    }
}
