//! Application context for CLI command execution.
//!
//! [`App`] resolves configuration (file, then command-line overrides),
//! opens the issue source and fixes "today" once for the whole command.

use crate::config::{CadenceConfig, default_config_path};
use crate::error::{Error, Result};
use crate::render::OutputConfig;
use crate::schedule::SchedulingConfig;
use crate::source::{IssueSource, SnapshotSource};
use cadence_calendar::CalendarDate;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Values from the command line that override the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Config file to read instead of `.cadence/config.yaml`.
    pub config: Option<PathBuf>,
    /// Snapshot to read instead of the configured one.
    pub source: Option<PathBuf>,
    /// Project namespace to use instead of the configured one.
    pub project: Option<String>,
}

/// Everything a command needs to run.
pub struct App {
    config: CadenceConfig,
    source: Box<dyn IssueSource>,
    output: OutputConfig,
    today: CalendarDate,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("source", &"<dyn IssueSource>")
            .field("output", &self.output)
            .field("today", &self.today)
            .finish()
    }
}

impl App {
    /// Resolve configuration and open the snapshot it names.
    ///
    /// # Errors
    ///
    /// Fails when the config file is invalid, no project is configured, or
    /// the snapshot cannot be read.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config_path = overrides.config.clone().unwrap_or_else(default_config_path);
        let mut config = if overrides.config.is_some() {
            CadenceConfig::load(&config_path)?
        } else {
            CadenceConfig::load_or_default(&config_path)?
        };
        if let Some(source) = &overrides.source {
            config.source.clone_from(source);
        }
        if let Some(project) = &overrides.project {
            config.project.clone_from(project);
        }
        config.project = config.project.trim().to_uppercase();
        if config.project.is_empty() {
            return Err(Error::Config(format!(
                "no project set; pass --project or add `project:` to {}",
                config_path.display()
            )));
        }
        debug!(?config, "Resolved configuration");

        let (snapshot, warnings) = SnapshotSource::load(&config.source)?;
        for warning in &warnings {
            warn!(path = %config.source.display(), "{warning}");
        }
        Ok(Self::with_source(config, Box::new(snapshot)))
    }

    /// Build around an already-open source.
    pub fn with_source(config: CadenceConfig, source: Box<dyn IssueSource>) -> Self {
        let output = OutputConfig::from_env(config.output.color);
        Self {
            config,
            source,
            output,
            today: CalendarDate::today(),
        }
    }

    /// Project namespace in scope.
    pub fn project(&self) -> &str {
        &self.config.project
    }

    /// Propagation knobs from the config file.
    pub fn scheduling(&self) -> SchedulingConfig {
        self.config.scheduling
    }

    /// Color settings after `NO_COLOR` and friends.
    pub fn output(&self) -> OutputConfig {
        self.output
    }

    /// "Today", fixed when the app was built.
    pub fn today(&self) -> CalendarDate {
        self.today
    }

    /// The issue source.
    pub fn source(&self) -> &dyn IssueSource {
        self.source.as_ref()
    }

    /// The issue source, for writing dates back.
    pub fn source_mut(&mut self) -> &mut dyn IssueSource {
        self.source.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueRecord, IssueStatus, ItemKey};
    use crate::source::InMemorySource;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_beat_config_file() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("issues.jsonl");
        SnapshotSource::create(
            &snapshot,
            InMemorySource::new()
                .with(IssueRecord::new(ItemKey::new("PLUM", 1), "one", IssueStatus::Backlog).epic()),
        )
        .unwrap();
        let config = dir.path().join("config.yaml");
        fs::write(&config, "project: PEACH\nsource: elsewhere.jsonl\n").unwrap();

        let app = App::load(&Overrides {
            config: Some(config),
            source: Some(snapshot),
            project: Some("plum".to_string()),
        })
        .unwrap();
        assert_eq!(app.project(), "PLUM");
        assert_eq!(app.source().epics_in_project("PLUM").unwrap().len(), 1);
    }

    #[test]
    fn test_project_required() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");
        fs::write(&config, "scheduling:\n  slack-days: 2\n").unwrap();

        let err = App::load(&Overrides {
            config: Some(config),
            ..Overrides::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("--project")));
    }
}
