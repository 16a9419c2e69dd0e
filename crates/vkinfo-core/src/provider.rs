//! Diagnostic text providers.
//!
//! The session never loads a provider globally: callers construct one of these handles and
//! inject it. Every provider call is synchronous and may fail; failures are reported as
//! [`ProviderError`] and never retried by the session.

use crate::error::ProviderError;
use crate::report::{VulkanReport, render_report};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Program run by [`CommandProvider::default`].
pub const DEFAULT_PROGRAM: &str = "vulkaninfo";

/// A source of diagnostic text.
pub trait DiagnosticProvider {
    /// Short human-readable description (used in titles and logs).
    fn describe(&self) -> String;

    /// Return the current diagnostic text.
    fn fetch(&mut self) -> Result<String, ProviderError>;
}

impl<P: DiagnosticProvider + ?Sized> DiagnosticProvider for Box<P> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&mut self) -> Result<String, ProviderError> {
        (**self).fetch()
    }
}

/// Runs an external program and returns its standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    /// Run `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for CommandProvider {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, Vec::new())
    }
}

impl DiagnosticProvider for CommandProvider {
    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn fetch(&mut self) -> Result<String, ProviderError> {
        log::info!("running {}", self.describe());
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProviderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProviderError::Status {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Reads diagnostic text from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    /// Read the file at `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DiagnosticProvider for FileProvider {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&mut self) -> Result<String, ProviderError> {
        std::fs::read_to_string(&self.path).map_err(|source| ProviderError::Read {
            path: self.path.clone(),
            source,
        })
    }
}

/// Loads a JSON [`VulkanReport`] snapshot and renders it as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportProvider {
    path: PathBuf,
}

impl ReportProvider {
    /// Load the JSON snapshot at `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DiagnosticProvider for ReportProvider {
    fn describe(&self) -> String {
        format!("report {}", self.path.display())
    }

    fn fetch(&mut self) -> Result<String, ProviderError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| ProviderError::Read {
            path: self.path.clone(),
            source,
        })?;
        let report: VulkanReport =
            serde_json::from_str(&json).map_err(|source| ProviderError::Report {
                path: self.path.clone(),
                source,
            })?;
        Ok(render_report(&report))
    }
}

/// Returns fixed text. Counts how often it was asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticProvider {
    text: String,
    fetches: usize,
}

impl StaticProvider {
    /// Return `text` on every fetch.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fetches: 0,
        }
    }

    /// Replace the text returned by the next fetch.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Number of completed fetches.
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl DiagnosticProvider for StaticProvider {
    fn describe(&self) -> String {
        "static text".to_string()
    }

    fn fetch(&mut self) -> Result<String, ProviderError> {
        self.fetches += 1;
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_counts_fetches() {
        let mut provider = StaticProvider::new("Vulkan Version: 1.3.0");
        assert_eq!(provider.fetch().unwrap(), "Vulkan Version: 1.3.0");
        provider.set_text("Vulkan Version: 1.3.1");
        assert_eq!(provider.fetch().unwrap(), "Vulkan Version: 1.3.1");
        assert_eq!(provider.fetches(), 2);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut provider = CommandProvider::new("vkinfo-definitely-not-installed", Vec::new());
        let err = provider.fetch().unwrap_err();
        assert!(matches!(err, ProviderError::Spawn { .. }), "{err}");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let mut provider = FileProvider::new("/nonexistent/vkinfo/report.txt");
        assert!(matches!(provider.fetch(), Err(ProviderError::Read { .. })));
    }

    #[test]
    fn test_describe() {
        let provider = CommandProvider::new("vulkaninfo", vec!["--summary".to_string()]);
        assert_eq!(provider.describe(), "vulkaninfo --summary");
        assert_eq!(CommandProvider::default().describe(), DEFAULT_PROGRAM);

        let boxed: Box<dyn DiagnosticProvider> = Box::new(StaticProvider::new(""));
        assert_eq!(boxed.describe(), "static text");
    }
}
