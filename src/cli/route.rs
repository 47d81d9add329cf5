//! CLI route: run context and command dispatch.

use crate::cli::input::load_entries;
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_entries_json, format_entries_text, format_patch_json, format_patch_text,
};
use crate::config::{ConfigLoader, EqualityMode, TreepatchConfig};
use crate::filter::FilterOptions;
use crate::tree::FsTree;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded configuration only.
pub struct RunContext {
    config: TreepatchConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ConfigLoader::load(&workspace_root)
                .context("Failed to load workspace configuration")?,
        };
        Ok(Self { config })
    }

    pub fn from_config(config: TreepatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TreepatchConfig {
        &self.config
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> anyhow::Result<String> {
        match command {
            Commands::Diff {
                from,
                to,
                format,
                equality,
            } => self.diff(from, to, *format, equality.as_deref()),
            Commands::Ls {
                snapshot,
                include,
                exclude,
                format,
            } => self.ls(snapshot, include, exclude, *format),
        }
    }

    fn load_tree(&self, file: &Path) -> anyhow::Result<FsTree> {
        let entries = load_entries(file)?;
        debug!(file = %file.display(), entry_count = entries.len(), "Loaded snapshot");
        FsTree::from_entries(entries, self.config.tree.tree_options())
            .with_context(|| format!("Invalid snapshot {}", file.display()))
    }

    fn diff(
        &self,
        from: &Path,
        to: &Path,
        format: OutputFormat,
        equality: Option<&str>,
    ) -> anyhow::Result<String> {
        let equality = match equality {
            Some(value) => EqualityMode::parse(value)?,
            None => self.config.tree.equality,
        };
        let ours = self.load_tree(from)?;
        let theirs = self.load_tree(to)?;

        let patch = ours.calculate_patch_with(&theirs, equality.predicate());
        info!(operation_count = patch.len(), ?equality, "Diff completed");

        Ok(match format {
            OutputFormat::Text => format_patch_text(&patch, self.config.logging.color),
            OutputFormat::Json => format_patch_json(&patch),
        })
    }

    fn ls(
        &self,
        snapshot: &Path,
        include: &[String],
        exclude: &[String],
        format: OutputFormat,
    ) -> anyhow::Result<String> {
        let tree = self.load_tree(snapshot)?;
        let filter = FilterOptions {
            include: include.to_vec(),
            exclude: exclude.to_vec(),
        };
        let entries = tree.match_entries(&filter)?;

        Ok(match format {
            OutputFormat::Text => format_entries_text(&entries),
            OutputFormat::Json => format_entries_json(&entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn context() -> RunContext {
        let mut config = TreepatchConfig::default();
        config.logging.color = false;
        RunContext::from_config(config)
    }

    #[test]
    fn test_diff_path_lists() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("from.txt");
        let to = temp_dir.path().join("to.txt");
        fs::write(&from, "a/b/c.js\n").unwrap();
        fs::write(&to, "x/y.js\n").unwrap();

        let output = context()
            .execute(&Commands::Diff {
                from,
                to,
                format: OutputFormat::Json,
                equality: None,
            })
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let ops: Vec<(String, String)> = value["operations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|op| {
                (
                    op["operation"].as_str().unwrap().to_string(),
                    op["path"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                ("unlink".to_string(), "a/b/c.js".to_string()),
                ("mkdir".to_string(), "x".to_string()),
                ("create".to_string(), "x/y.js".to_string()),
                ("rmdir".to_string(), "a/b".to_string()),
                ("rmdir".to_string(), "a".to_string()),
            ]
        );
    }

    #[test]
    fn test_diff_rejects_unknown_equality() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("s.txt");
        fs::write(&file, "a.js\n").unwrap();

        let result = context().execute(&Commands::Diff {
            from: file.clone(),
            to: file,
            format: OutputFormat::Text,
            equality: Some("content".to_string()),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_ls_with_globs() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("s.txt");
        fs::write(&file, "src/a.js\nsrc/b.css\nvendor/c.js\n").unwrap();

        let output = context()
            .execute(&Commands::Ls {
                snapshot: file,
                include: vec!["**/*.js".to_string()],
                exclude: vec!["vendor/**".to_string()],
                format: OutputFormat::Text,
            })
            .unwrap();
        assert!(output.contains("src/a.js"));
        assert!(!output.contains("b.css"));
        assert!(!output.contains("vendor/c.js"));
    }
}
