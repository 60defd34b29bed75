//! Locating pandoc and probing what it supports

use crate::exec::{IoOptions, Output, run_command};
use crate::info::{BinSource, VersionReport, parse_lines, parse_version_report};
use pandoclab_core::config::consts::{DEFAULT_PANDOC_BIN, PANDOC_PATH_ENV};
use pandoclab_core::{PandoclabError, Result, Version};
use std::collections::BTreeSet;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// First release with the `--list-*` flags
pub const LIST_FLAGS_SINCE: [u64; 2] = [1, 18];

/// Everything learned about one executable
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub report: VersionReport,
    pub input_formats: BTreeSet<String>,
    pub output_formats: BTreeSet<String>,
    pub highlight_languages: BTreeSet<String>,
}

/// Chooses the executable name or path to use
///
/// Priority: `hint`, then `env_override`, then `pandoc`. Empty values are
/// skipped.
pub fn select_candidate(hint: Option<&str>, env_override: Option<&str>) -> (String, BinSource) {
    let non_empty = |value: Option<&str>| value.filter(|v| !v.trim().is_empty()).map(str::to_string);

    if let Some(hint) = non_empty(hint) {
        (hint, BinSource::Explicit)
    } else if let Some(env) = non_empty(env_override) {
        (env, BinSource::Environment)
    } else {
        (DEFAULT_PANDOC_BIN.to_string(), BinSource::Default)
    }
}

/// Reads `PANDOC_PATH` from the process environment
pub fn env_override() -> Option<String> {
    std::env::var(PANDOC_PATH_ENV).ok()
}

/// Turns a candidate into an existing path
///
/// Bare names are looked up on `PATH`, anything with a separator is used as
/// given.
///
/// # Errors
///
/// Returns `NotFound` if nothing exists under that name.
pub fn resolve_bin(candidate: &str) -> Result<PathBuf> {
    let has_separator = candidate.contains(MAIN_SEPARATOR) || candidate.contains('/');

    if has_separator {
        let path = PathBuf::from(candidate);
        if path.is_file() {
            return Ok(path);
        }
        return Err(PandoclabError::NotFound {
            path: candidate.to_string(),
            reason: "no such file".to_string(),
        });
    }

    which::which(candidate).map_err(|e| PandoclabError::NotFound {
        path: candidate.to_string(),
        reason: e.to_string(),
    })
}

/// Runs `<bin> --version` and parses the report
///
/// # Errors
///
/// Returns `NotFound` if the binary cannot be started, exits non-zero, or
/// prints something that is not a version report.
pub fn probe(bin: &Path) -> Result<VersionReport> {
    let not_found = |reason: String| PandoclabError::NotFound {
        path: bin.display().to_string(),
        reason,
    };

    let outcome = run_command(bin, &["--version".to_string()], IoOptions::capture());
    if outcome.launch_failed() {
        return Err(not_found("could not execute".to_string()));
    }
    if outcome.signaled {
        return Err(not_found("--version was terminated by a signal".to_string()));
    }
    if !outcome.success() {
        return Err(not_found(format!(
            "--version exited with code {}: {}",
            outcome.exit_code,
            outcome.stderr.to_text().trim()
        )));
    }

    let stdout = outcome.stdout.to_text();
    parse_version_report(&stdout)
        .map_err(|e| not_found(format!("unexpected --version output: {}", e)))
}

/// Probes the version report and, where supported, the format lists
///
/// A failing `--list-*` probe leaves its set empty.
pub fn probe_capabilities(bin: &Path) -> Result<Capabilities> {
    let report = probe(bin)?;
    tracing::debug!(bin = %bin.display(), version = %report.version, "probed pandoc");

    let mut capabilities = Capabilities {
        highlight_languages: report.highlight_languages.clone(),
        report,
        input_formats: BTreeSet::new(),
        output_formats: BTreeSet::new(),
    };

    if supports_list_flags(&capabilities.report.version) {
        capabilities.input_formats = query_list(bin, "--list-input-formats");
        capabilities.output_formats = query_list(bin, "--list-output-formats");
        capabilities.highlight_languages = query_list(bin, "--list-highlight-languages");
    }

    Ok(capabilities)
}

pub fn supports_list_flags(version: &Version) -> bool {
    *version >= Version::from_parts(LIST_FLAGS_SINCE)
}

fn query_list(bin: &Path, flag: &str) -> BTreeSet<String> {
    let io = IoOptions::capture().stderr(Output::Null);
    let outcome = run_command(bin, &[flag.to_string()], io);
    if outcome.success() {
        parse_lines(&outcome.stdout.to_text())
    } else {
        tracing::debug!(bin = %bin.display(), flag, exit_code = outcome.exit_code, "list probe failed");
        BTreeSet::new()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pandoclab_testkit::{PANDOC_2_19_REPORT, fake_pandoc, write_executable};

    #[test]
    fn test_select_candidate_priority() {
        assert_eq!(
            select_candidate(Some("/opt/pandoc"), Some("/env/pandoc")),
            ("/opt/pandoc".to_string(), BinSource::Explicit)
        );
        assert_eq!(
            select_candidate(None, Some("/env/pandoc")),
            ("/env/pandoc".to_string(), BinSource::Environment)
        );
        assert_eq!(
            select_candidate(Some(""), Some(" ")),
            ("pandoc".to_string(), BinSource::Default)
        );
    }

    #[test]
    fn test_resolve_bin_missing_path() {
        let err = resolve_bin("/nonexistent/dir/pandoc").unwrap_err();
        assert!(matches!(err, PandoclabError::NotFound { .. }));
    }

    #[test]
    fn test_resolve_bin_missing_name() {
        let err = resolve_bin("pandoclab-no-such-binary").unwrap_err();
        assert!(err.to_string().contains("pandoclab-no-such-binary"));
    }

    #[test]
    fn test_resolve_bin_existing_path() {
        let temp = tempfile::tempdir().unwrap();
        let bin = fake_pandoc(temp.path(), PANDOC_2_19_REPORT);
        assert_eq!(resolve_bin(bin.to_str().unwrap()).unwrap(), bin);
    }

    #[test]
    fn test_probe_capabilities() {
        let temp = tempfile::tempdir().unwrap();
        let bin = fake_pandoc(temp.path(), PANDOC_2_19_REPORT);

        let capabilities = probe_capabilities(&bin).unwrap();
        assert_eq!(capabilities.report.version, Version::parse("2.19.2").unwrap());
        assert!(capabilities.input_formats.contains("markdown"));
        assert!(capabilities.output_formats.contains("html"));
        assert!(capabilities.highlight_languages.contains("rust"));
    }

    #[test]
    fn test_probe_nonzero_exit() {
        let temp = tempfile::tempdir().unwrap();
        let bin = write_executable(temp.path(), "pandoc", "#!/bin/sh\necho broken >&2\nexit 3\n");

        let err = probe(&bin).unwrap_err();
        assert!(matches!(err, PandoclabError::NotFound { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_probe_crashed_binary() {
        let temp = tempfile::tempdir().unwrap();
        let bin = write_executable(temp.path(), "pandoc", "#!/bin/sh\nkill -9 $$\n");

        let err = probe(&bin).unwrap_err();
        assert!(matches!(err, PandoclabError::NotFound { .. }));
        assert!(err.to_string().contains("terminated by a signal"));
        assert!(!err.to_string().contains("could not execute"));
    }

    #[test]
    fn test_probe_garbage_output() {
        let temp = tempfile::tempdir().unwrap();
        let bin = write_executable(temp.path(), "pandoc", "#!/bin/sh\necho hello\n");

        assert!(matches!(
            probe(&bin).unwrap_err(),
            PandoclabError::NotFound { .. }
        ));
    }

    #[test]
    fn test_list_probe_failure_leaves_sets_empty() {
        let temp = tempfile::tempdir().unwrap();
        let script = "#!/bin/sh\n\
                      if [ \"$1\" = \"--version\" ]; then echo 'pandoc 2.5'; exit 0; fi\n\
                      exit 1\n";
        let bin = write_executable(temp.path(), "pandoc", script);

        let capabilities = probe_capabilities(&bin).unwrap();
        assert!(capabilities.input_formats.is_empty());
        assert!(capabilities.highlight_languages.is_empty());
    }

    #[test]
    fn test_supports_list_flags() {
        assert!(!supports_list_flags(&Version::parse("1.17.2").unwrap()));
        assert!(supports_list_flags(&Version::parse("1.18").unwrap()));
        assert!(supports_list_flags(&Version::parse("3.0").unwrap()));
    }
}
