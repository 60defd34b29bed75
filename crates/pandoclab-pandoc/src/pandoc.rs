//! The [`Pandoc`] executable handle

use crate::exec::{Captured, Input, IoOptions, Output, RunOutcome, run_command};
use crate::info::{BinSource, parse_extensions};
use crate::resolve::{
    Capabilities, LIST_FLAGS_SINCE, env_override, probe_capabilities, resolve_bin,
    select_candidate, supports_list_flags,
};
use pandoclab_core::config::PandocConfig;
use pandoclab_core::{PandoclabError, Result, Version, VersionRange};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// One located pandoc executable and what it reported about itself
///
/// The version and capability fields always describe the executable at
/// [`Pandoc::bin`]; they are re-read whenever the binding changes.
///
/// A handle is not meant to be shared across threads while it is rebound.
#[derive(Debug, Clone)]
pub struct Pandoc {
    bin: PathBuf,
    source: BinSource,
    capabilities: Capabilities,
    default_arguments: Vec<String>,
}

impl Pandoc {
    /// Locates pandoc
    ///
    /// Uses `hint` when given, else `env_override`, else `pandoc` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the executable does not exist or does not answer
    /// `--version` with a version report.
    pub fn locate(hint: Option<&str>, env_override: Option<&str>) -> Result<Self> {
        let (candidate, source) = select_candidate(hint, env_override);
        let bin = resolve_bin(&candidate)?;
        let capabilities = probe_capabilities(&bin)?;

        tracing::debug!(
            bin = %bin.display(),
            %source,
            version = %capabilities.report.version,
            "located pandoc"
        );

        Ok(Self {
            bin,
            source,
            capabilities,
            default_arguments: Vec::new(),
        })
    }

    /// Locates pandoc, reading `PANDOC_PATH` from the process environment
    pub fn new(hint: Option<&str>) -> Result<Self> {
        Self::locate(hint, env_override().as_deref())
    }

    /// Locates the configured executable with its default arguments
    ///
    /// The configured `bin` already reflects `PANDOC_PATH` when the config
    /// was built with the environment applied.
    pub fn from_config(config: &PandocConfig) -> Result<Self> {
        Ok(Self::locate(config.bin.as_deref(), None)?.with_arguments(config.arguments.clone()))
    }

    /// Arguments placed before the per-call arguments of every run
    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.default_arguments = arguments;
        self
    }

    pub fn set_arguments(&mut self, arguments: Vec<String>) {
        self.default_arguments = arguments;
    }

    /// Binds another executable and re-reads its capabilities
    ///
    /// On error the handle keeps its previous binding.
    pub fn set_bin(&mut self, bin: impl AsRef<Path>) -> Result<()> {
        let candidate = bin.as_ref().to_string_lossy().into_owned();
        let resolved = resolve_bin(&candidate)?;
        let capabilities = probe_capabilities(&resolved)?;

        self.bin = resolved;
        self.source = BinSource::Explicit;
        self.capabilities = capabilities;
        Ok(())
    }

    /// Re-runs the version and format probes for the current binding
    pub fn refresh_capabilities(&mut self) -> Result<()> {
        self.capabilities = probe_capabilities(&self.bin)?;
        Ok(())
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    pub fn source(&self) -> BinSource {
        self.source
    }

    pub fn version(&self) -> &Version {
        &self.capabilities.report.version
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.capabilities.report.data_dir.as_deref()
    }

    pub fn input_formats(&self) -> &BTreeSet<String> {
        &self.capabilities.input_formats
    }

    pub fn output_formats(&self) -> &BTreeSet<String> {
        &self.capabilities.output_formats
    }

    pub fn highlight_languages(&self) -> &BTreeSet<String> {
        &self.capabilities.highlight_languages
    }

    /// Compiled-in libraries and their versions
    pub fn libraries(&self) -> &BTreeMap<String, Version> {
        &self.capabilities.report.libraries
    }

    pub fn default_arguments(&self) -> &[String] {
        &self.default_arguments
    }

    /// Fails unless the bound version satisfies `range`
    ///
    /// # Errors
    ///
    /// Returns `VersionMismatch` naming the range and the actual version.
    pub fn require(&self, range: &VersionRange) -> Result<&Self> {
        if self.version_satisfies(range) {
            Ok(self)
        } else {
            Err(PandoclabError::VersionMismatch {
                range: range.to_string(),
                found: self.version().to_string(),
            })
        }
    }

    pub fn version_satisfies(&self, range: &VersionRange) -> bool {
        range.satisfies(self.version())
    }

    /// Extensions of `format` (or of all formats) and whether each is enabled
    /// by default
    ///
    /// # Errors
    ///
    /// Returns `VersionMismatch` for pandoc older than 1.18 and
    /// `ConversionFailed` if pandoc rejects the query.
    pub fn extensions(&self, format: Option<&str>) -> Result<BTreeMap<String, bool>> {
        if !supports_list_flags(self.version()) {
            return Err(PandoclabError::VersionMismatch {
                range: format!(">={}", Version::from_parts(LIST_FLAGS_SINCE)),
                found: self.version().to_string(),
            });
        }

        let flag = match format {
            Some(format) => format!("--list-extensions={}", format),
            None => "--list-extensions".to_string(),
        };
        let outcome = run_command(&self.bin, &[flag], IoOptions::capture());
        let stdout = check_success(outcome)?;
        Ok(parse_extensions(&stdout.to_text()))
    }

    /// Runs pandoc with the default arguments followed by `arguments`
    ///
    /// Launch failures are reported as exit code `-1`, not as errors.
    pub fn run<S: AsRef<str>>(&self, arguments: &[S], io: IoOptions) -> RunOutcome {
        let args: Vec<String> = self
            .default_arguments
            .iter()
            .cloned()
            .chain(arguments.iter().map(|arg| arg.as_ref().to_string()))
            .collect();

        tracing::debug!(bin = %self.bin.display(), ?args, "running pandoc");
        run_command(&self.bin, &args, io)
    }

    /// Converts text from one format to another
    ///
    /// # Errors
    ///
    /// Returns `ConversionFailed` with pandoc's stderr on a non-zero exit.
    pub fn convert<S: AsRef<str>>(
        &self,
        from: &str,
        to: &str,
        input: &str,
        extra: &[S],
    ) -> Result<String> {
        let io = IoOptions::capture().stdin(Input::Text(input.to_string()));
        let outcome = self.run(&conversion_args(from, to, extra), io);
        match check_success(outcome)? {
            Captured::Text(text) => Ok(text),
            other => Ok(other.to_text().into_owned()),
        }
    }

    /// Converts raw bytes, returning pandoc's output undecoded
    pub fn convert_bytes<S: AsRef<str>>(
        &self,
        from: &str,
        to: &str,
        input: &[u8],
        extra: &[S],
    ) -> Result<Vec<u8>> {
        let io = IoOptions::capture()
            .stdin(Input::Bytes(input.to_vec()))
            .stdout(Output::Bytes);
        let outcome = self.run(&conversion_args(from, to, extra), io);
        Ok(check_success(outcome)?.into_bytes())
    }
}

fn conversion_args<S: AsRef<str>>(from: &str, to: &str, extra: &[S]) -> Vec<String> {
    let mut args = vec![
        "-f".to_string(),
        from.to_string(),
        "-t".to_string(),
        to.to_string(),
    ];
    args.extend(extra.iter().map(|arg| arg.as_ref().to_string()));
    args
}

fn check_success(outcome: RunOutcome) -> Result<Captured> {
    if outcome.success() {
        Ok(outcome.stdout)
    } else {
        Err(PandoclabError::ConversionFailed {
            exit_code: outcome.exit_code,
            stderr: outcome.stderr.to_text().trim().to_string(),
        })
    }
}
