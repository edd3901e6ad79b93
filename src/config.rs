use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file looked up in the scan root when `--config` is not given.
pub const CONFIG_FILE: &str = "docs-improve.toml";

/// The assistant's own config file, passed unless an agent opts out.
pub const TOOL_CONFIG_FILE: &str = ".aider.conf.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Read-only README shown to the assistant as the style to follow.
    pub reference: PathBuf,
    /// Replaces the bundled instruction text when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_agent: Option<String>,
    pub select: SelectConfig,
    pub agents: BTreeMap<String, AgentConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    pub file_name: String,
    pub segment: String,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_tool_config")]
    pub config_file: PathBuf,
    /// Leave `config_file` off the command line.
    #[serde(default)]
    pub skip_config_file: bool,
    #[serde(default = "default_true")]
    pub auto_accept: bool,
    #[serde(default)]
    pub restore_history: bool,
}

fn default_true() -> bool {
    true
}

fn default_tool_config() -> PathBuf {
    PathBuf::from(TOOL_CONFIG_FILE)
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            command: "aider".to_string(),
            args: Vec::new(),
            config_file: default_tool_config(),
            skip_config_file: false,
            auto_accept: true,
            restore_history: false,
        }
    }
}

impl AgentConfig {
    /// The tool config file to pass, if any.
    pub fn tool_config(&self) -> Option<&Path> {
        (!self.skip_config_file).then_some(self.config_file.as_path())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference: PathBuf::from("plain-models/plain/models/README.md"),
            instructions: None,
            default_agent: None,
            select: SelectConfig::default(),
            agents: BTreeMap::new(),
        }
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            file_name: "README.md".to_string(),
            segment: "plain/".to_string(),
            exclude: vec![
                ".venv".to_string(),
                ".pytest_cache".to_string(),
                "./plain/README.md".to_string(),
            ],
        }
    }
}

/// Load config from `explicit`, or from `docs-improve.toml` under `root`.
///
/// A missing default file yields the built-in defaults; a missing explicit
/// file is an error.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = root.join(CONFIG_FILE);
            if !p.exists() {
                tracing::debug!("no {} in {}, using defaults", CONFIG_FILE, root.display());
                return Ok(Config::default());
            }
            p
        }
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Render the defaults as a commented starting point for `init`.
pub fn template() -> Result<String> {
    let mut config = Config::default();
    config.default_agent = Some("aider".to_string());
    config
        .agents
        .insert("aider".to_string(), AgentConfig::default());
    let body = toml::to_string_pretty(&config)?;
    Ok(format!(
        "# docs-improve configuration. Paths are relative to the scanned repository root.\n\n{}",
        body
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_default_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.select.file_name, "README.md");
        assert!(config.select.exclude.contains(&".venv".to_string()));
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load(dir.path(), Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "reference = \"docs/STYLE.md\"\n\n[select]\nsegment = \"pkg/\"\n",
        )
        .unwrap();
        let config = load(dir.path(), None).unwrap();
        assert_eq!(config.reference, PathBuf::from("docs/STYLE.md"));
        assert_eq!(config.select.segment, "pkg/");
        assert_eq!(config.select.file_name, "README.md");
        assert_eq!(config.select.exclude.len(), 3);
    }

    #[test]
    fn agent_entry_defaults_flags() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[agents.mine]\ncommand = \"my-aider\"\n",
        )
        .unwrap();
        let config = load(dir.path(), None).unwrap();
        let agent = &config.agents["mine"];
        assert_eq!(agent.command, "my-aider");
        assert!(agent.auto_accept);
        assert!(!agent.restore_history);
        assert_eq!(agent.tool_config(), Some(Path::new(TOOL_CONFIG_FILE)));
    }

    #[test]
    fn partial_aider_entry_keeps_tool_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[agents.aider]\ncommand = \"aider\"\n",
        )
        .unwrap();
        let config = load(dir.path(), None).unwrap();
        assert_eq!(config.agents["aider"], AgentConfig::default());
    }

    #[test]
    fn tool_config_can_be_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[agents.aider]\ncommand = \"aider\"\nskip_config_file = true\n",
        )
        .unwrap();
        let config = load(dir.path(), None).unwrap();
        assert_eq!(config.agents["aider"].tool_config(), None);
    }

    #[test]
    fn invalid_toml_names_the_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "reference = [").unwrap();
        let err = load(dir.path(), None).unwrap_err();
        assert!(format!("{err}").contains(CONFIG_FILE));
    }

    #[test]
    fn template_parses_back() {
        let text = template().unwrap();
        assert!(text.starts_with("# docs-improve"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_agent.as_deref(), Some("aider"));
        assert_eq!(
            parsed.agents["aider"].config_file,
            PathBuf::from(TOOL_CONFIG_FILE)
        );
    }
}
