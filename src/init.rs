use anyhow::{Context, Result};
use std::path::Path;

use crate::config;

pub fn run(root: &Path) -> Result<()> {
    let file = root.join(config::CONFIG_FILE);
    if file.exists() {
        anyhow::bail!("file already exists: {}", file.display());
    }

    let content = config::template()?;
    std::fs::write(&file, content)
        .with_context(|| format!("failed to write {}", file.display()))?;
    eprintln!("Created {}", file.display());
    Ok(())
}
