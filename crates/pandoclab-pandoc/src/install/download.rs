//! Package download and executable extraction
//!
//! Pandoc publishes a Debian package per architecture with every release.
//! [`download`] mirrors that package into a directory and can extract the
//! `pandoc` executable from it, naming the result after the version so that
//! several versions can be installed side by side:
//!
//! ```text
//! {dir}/pandoc-2.19.2-1-amd64.deb
//! {bin}/2.19.2
//! {bin}/pandoc -> 2.19.2        (with `link`)
//! ```
//!
//! Extraction does not go through a shell. `dpkg --fsys-tarfile` is run with
//! an argument list and its output is read as a tar stream, so every step can
//! be named when it fails.

use super::platform::binary_name;
use super::release::Release;
use crate::github::HttpClient;
use pandoclab_core::{PandoclabError, Result, Version};
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Package name prefix of the 1.17 build whose package is broken
pub const KNOWN_BAD_PREFIX: &str = "pandoc-1.17-";

/// Location of the executable inside pandoc's Debian packages
const PAYLOAD_PATH: &str = "usr/bin/pandoc";

/// Download configuration options
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Directory the package is mirrored to (required)
    pub dir: Option<PathBuf>,
    /// Debian architecture, e.g. `amd64` (required)
    pub arch: Option<String>,
    /// Directory to extract the executable to
    pub bin: Option<PathBuf>,
    /// Report mirrored and extracted paths
    pub verbose: bool,
    /// Point `{bin}/pandoc` at the extracted executable
    pub link: bool,
    /// `dpkg` executable used for extraction
    pub dpkg: PathBuf,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            dir: None,
            arch: None,
            bin: None,
            verbose: false,
            link: false,
            dpkg: PathBuf::from("dpkg"),
        }
    }
}

/// Downloads the Debian package of `release` and optionally extracts pandoc
///
/// 1. Requires `dir` and `arch`
/// 2. Creates `dir` (and `bin`) if needed
/// 3. Selects the asset named `*-{arch}.deb`
/// 4. Skips the known-broken `pandoc-1.17-*` packages
/// 5. Mirrors the asset to `{dir}/{asset name}`
/// 6. Extracts the executable to `{bin}/{version}` when `bin` is set
///
/// Repeated calls are cheap: the mirror step does not transfer an unchanged
/// package again.
///
/// # Returns
///
/// - `Ok(Some(version))` when the package was mirrored (and extracted)
/// - `Ok(None)` when there is nothing to download: no package for `arch`, a
///   known-bad package, or an asset without download URL
///
/// # Errors
///
/// - `ConfigError` if `dir` or `arch` is missing
/// - `IoError` if a directory cannot be created
/// - `FetchFailed` if the download does not succeed
/// - `ExtractionFailed` naming the failed step
pub fn download<C: HttpClient + ?Sized>(
    client: &C,
    release: &Release,
    options: &DownloadOptions,
) -> Result<Option<Version>> {
    // 1. Required parameters
    let dir = options
        .dir
        .as_deref()
        .ok_or_else(|| PandoclabError::ConfigError("download requires a target dir".to_string()))?;
    let arch = options
        .arch
        .as_deref()
        .ok_or_else(|| PandoclabError::ConfigError("download requires an arch".to_string()))?;

    // 2. Directories
    ensure_dir(dir)?;
    if let Some(bin) = &options.bin {
        ensure_dir(bin)?;
    }

    // 3. Asset selection
    let Some(asset) = release.deb_asset(arch) else {
        tracing::debug!(tag = %release.tag_name, arch, "no Debian package for architecture");
        return Ok(None);
    };

    // 4. Known-bad build
    if asset.name.starts_with(KNOWN_BAD_PREFIX) {
        tracing::warn!(asset = %asset.name, "skipping broken pandoc 1.17 package");
        return Ok(None);
    }

    let Some(url) = asset.download_url.as_deref() else {
        tracing::debug!(asset = %asset.name, "asset has no download URL");
        return Ok(None);
    };

    // 5. Mirror
    let deb = dir.join(&asset.name);
    let outcome = client.mirror(url, &deb)?;
    if !outcome.is_success() {
        return Err(PandoclabError::fetch(url, format!("HTTP status {}", outcome.status)));
    }
    report(options.verbose, &deb);

    // 6. Extraction
    if let Some(bin) = &options.bin {
        let executable = extract_executable(&options.dpkg, &deb, bin, &release.version)?;
        report(options.verbose, &executable);

        if options.link {
            link_executable(bin, &release.version)?;
        }
    }

    Ok(Some(release.version.clone()))
}

fn report(verbose: bool, path: &Path) {
    if verbose {
        tracing::info!(path = %path.display(), "wrote");
    } else {
        tracing::debug!(path = %path.display(), "wrote");
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| PandoclabError::IoError {
        operation: "create directory".to_string(),
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Extracts `usr/bin/pandoc` from a Debian package into `{bin}/{version}`
///
/// # Returns
///
/// Path to the extracted executable
///
/// # Errors
///
/// Returns `ExtractionFailed` naming the step that failed: running `dpkg`,
/// reading its tar output, or installing the executable.
pub fn extract_executable(dpkg: &Path, deb: &Path, bin: &Path, version: &Version) -> Result<PathBuf> {
    let command = format!("{} --fsys-tarfile {}", dpkg.display(), deb.display());
    let failed = |reason: String| PandoclabError::ExtractionFailed {
        command: command.clone(),
        reason,
    };

    // Temp file in `bin` so the final rename is atomic
    let mut temp = tempfile::NamedTempFile::new_in(bin).map_err(|e| PandoclabError::IoError {
        operation: "create temporary file in".to_string(),
        path: bin.to_path_buf(),
        source: e,
    })?;

    let mut child = Command::new(dpkg)
        .arg("--fsys-tarfile")
        .arg(deb)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| failed(format!("could not start: {}", e)))?;

    let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(failed("output not captured".to_string()));
    };

    // Collect stderr on its own thread so a chatty dpkg cannot stall stdout
    let errors = thread::spawn(move || {
        let mut data = Vec::new();
        let _ = stderr.read_to_end(&mut data);
        data
    });

    let found = copy_payload(&mut stdout, temp.as_file_mut());

    // Drain the rest so dpkg is not blocked writing to a closed pipe
    let _ = io::copy(&mut stdout, &mut io::sink());
    drop(stdout);

    let status = child
        .wait()
        .map_err(|e| failed(format!("could not wait for dpkg: {}", e)))?;
    let errors = errors.join().unwrap_or_default();

    if !status.success() {
        let stderr = String::from_utf8_lossy(&errors);
        return Err(failed(format!("{}: {}", status, stderr.trim())));
    }

    let tar_command = format!("tar -x ./{}", PAYLOAD_PATH);
    match found {
        Ok(true) => {}
        Ok(false) => {
            return Err(PandoclabError::ExtractionFailed {
                command: tar_command,
                reason: format!("{} not found in {}", PAYLOAD_PATH, deb.display()),
            });
        }
        Err(e) => {
            return Err(PandoclabError::ExtractionFailed {
                command: tar_command,
                reason: e.to_string(),
            });
        }
    }

    #[cfg(unix)]
    set_executable_permissions(temp.path()).map_err(|e| PandoclabError::ExtractionFailed {
        command: format!("chmod +x {}", temp.path().display()),
        reason: e.to_string(),
    })?;

    let target = bin.join(version.to_string());
    temp.persist(&target).map_err(|e| PandoclabError::IoError {
        operation: "install executable".to_string(),
        path: target.clone(),
        source: e.error,
    })?;

    Ok(target)
}

/// Copies the pandoc entry of a tar stream into `out`
///
/// Returns whether the entry was present.
fn copy_payload<R: Read>(reader: R, out: &mut fs::File) -> io::Result<bool> {
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries()? {
        let mut entry = entry?;
        if is_payload(&entry.path()?) {
            io::copy(&mut entry, out)?;
            out.sync_all()?;
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_payload(path: &Path) -> bool {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    normalized == Path::new(PAYLOAD_PATH)
}

#[cfg(unix)]
fn set_executable_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

/// Points `{bin}/pandoc` at `{bin}/{version}`
#[cfg(unix)]
fn link_executable(bin: &Path, version: &Version) -> Result<()> {
    let link = bin.join(binary_name());

    if fs::symlink_metadata(&link).is_ok() {
        fs::remove_file(&link).map_err(|e| PandoclabError::IoError {
            operation: "replace link".to_string(),
            path: link.clone(),
            source: e,
        })?;
    }

    std::os::unix::fs::symlink(version.to_string(), &link).map_err(|e| PandoclabError::IoError {
        operation: "create link".to_string(),
        path: link.clone(),
        source: e,
    })?;

    tracing::debug!(link = %link.display(), %version, "linked");
    Ok(())
}

#[cfg(not(unix))]
fn link_executable(bin: &Path, _version: &Version) -> Result<()> {
    tracing::warn!(bin = %bin.join(binary_name()).display(), "symlinks are only created on unix");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::MirrorOutcome;
    use serde_json::json;
    use std::cell::RefCell;

    /// Mirror that writes a fixed body once and then reports "not modified"
    #[derive(Default)]
    struct FakeMirror {
        calls: RefCell<Vec<String>>,
        transfers: RefCell<usize>,
    }

    impl HttpClient for FakeMirror {
        fn get(&self, _url: &str) -> Result<crate::github::HttpResponse> {
            unreachable!("download never lists releases")
        }

        fn mirror(&self, url: &str, dest: &Path) -> Result<MirrorOutcome> {
            self.calls.borrow_mut().push(url.to_string());
            if dest.exists() {
                return Ok(MirrorOutcome {
                    status: 304,
                    transferred: false,
                });
            }
            fs::write(dest, b"deb")?;
            *self.transfers.borrow_mut() += 1;
            Ok(MirrorOutcome {
                status: 200,
                transferred: true,
            })
        }
    }

    fn release(tag: &str, assets: serde_json::Value) -> Release {
        Release::from_json(json!({"tag_name": tag, "assets": assets})).unwrap()
    }

    fn options(dir: &Path) -> DownloadOptions {
        DownloadOptions {
            dir: Some(dir.to_path_buf()),
            arch: Some("amd64".to_string()),
            ..DownloadOptions::default()
        }
    }

    #[test]
    fn test_download_requires_dir_and_arch() {
        let client = FakeMirror::default();
        let release = release("2.0", json!([]));

        let no_dir = DownloadOptions {
            arch: Some("amd64".to_string()),
            ..DownloadOptions::default()
        };
        assert!(matches!(
            download(&client, &release, &no_dir),
            Err(PandoclabError::ConfigError(_))
        ));

        let no_arch = DownloadOptions {
            dir: Some(PathBuf::from("/tmp")),
            ..DownloadOptions::default()
        };
        assert!(matches!(
            download(&client, &release, &no_arch),
            Err(PandoclabError::ConfigError(_))
        ));
    }

    #[test]
    fn test_download_creates_dir() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("a").join("b");
        let client = FakeMirror::default();

        let result = download(&client, &release("2.0", json!([])), &options(&dir)).unwrap();

        assert_eq!(result, None);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_download_dir_is_a_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();

        let client = FakeMirror::default();
        let result = download(&client, &release("2.0", json!([])), &options(&file));
        assert!(matches!(result, Err(PandoclabError::IoError { .. })));
    }

    #[test]
    fn test_download_no_matching_asset() {
        let temp = tempfile::tempdir().unwrap();
        let client = FakeMirror::default();
        let release = release(
            "2.0",
            json!([{"name": "pandoc-2.0-1-arm64.deb", "browser_download_url": "https://x/arm"}]),
        );

        assert_eq!(download(&client, &release, &options(temp.path())).unwrap(), None);
        assert!(client.calls.borrow().is_empty());
    }

    #[test]
    fn test_download_skips_known_bad_release() {
        let temp = tempfile::tempdir().unwrap();
        let client = FakeMirror::default();
        let release = release(
            "1.17",
            json!([{"name": "pandoc-1.17-1-amd64.deb", "browser_download_url": "https://x/bad"}]),
        );

        assert_eq!(download(&client, &release, &options(temp.path())).unwrap(), None);
        assert!(client.calls.borrow().is_empty());
    }

    #[test]
    fn test_download_asset_without_url() {
        let temp = tempfile::tempdir().unwrap();
        let client = FakeMirror::default();
        let release = release("2.0", json!([{"name": "pandoc-2.0-1-amd64.deb"}]));

        assert_eq!(download(&client, &release, &options(temp.path())).unwrap(), None);
        assert!(client.calls.borrow().is_empty());
    }

    #[test]
    fn test_download_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let client = FakeMirror::default();
        let release = release(
            "2.0.0.1",
            json!([{"name": "pandoc-2.0.0.1-1-amd64.deb", "browser_download_url": "https://x/deb"}]),
        );
        let options = options(temp.path());

        let first = download(&client, &release, &options).unwrap();
        let second = download(&client, &release, &options).unwrap();

        assert_eq!(first, Some(Version::parse("2.0.0.1").unwrap()));
        assert_eq!(first, second);
        assert_eq!(*client.transfers.borrow(), 1);
        assert!(temp.path().join("pandoc-2.0.0.1-1-amd64.deb").is_file());
    }

    #[test]
    fn test_download_mirror_failure() {
        struct Failing;
        impl HttpClient for Failing {
            fn get(&self, _url: &str) -> Result<crate::github::HttpResponse> {
                unreachable!()
            }
            fn mirror(&self, _url: &str, _dest: &Path) -> Result<MirrorOutcome> {
                Ok(MirrorOutcome {
                    status: 500,
                    transferred: false,
                })
            }
        }

        let temp = tempfile::tempdir().unwrap();
        let release = release(
            "2.0",
            json!([{"name": "pandoc-2.0-1-amd64.deb", "browser_download_url": "https://x/deb"}]),
        );

        match download(&Failing, &release, &options(temp.path())).unwrap_err() {
            PandoclabError::FetchFailed { url, reason } => {
                assert_eq!(url, "https://x/deb");
                assert!(reason.contains("500"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_is_payload() {
        assert!(is_payload(Path::new("./usr/bin/pandoc")));
        assert!(is_payload(Path::new("usr/bin/pandoc")));
        assert!(!is_payload(Path::new("./usr/bin/pandoc-server")));
        assert!(!is_payload(Path::new("./usr/share/doc/pandoc")));
    }

    #[cfg(unix)]
    mod extraction {
        use super::*;
        use pandoclab_testkit::{deb_payload_tar, noisy_dpkg};
        use std::sync::mpsc;
        use std::time::Duration;

        #[test]
        fn test_extract_survives_verbose_dpkg() {
            let temp = tempfile::tempdir().unwrap();
            let dpkg = noisy_dpkg(temp.path());
            let deb = temp.path().join("pandoc-2.0-1-amd64.deb");
            fs::write(&deb, deb_payload_tar(b"#!/bin/sh\necho pandoc 2.0\n")).unwrap();
            let bin = temp.path().join("bin");
            fs::create_dir(&bin).unwrap();

            let (tx, rx) = mpsc::channel();
            let target = bin.clone();
            std::thread::spawn(move || {
                let version = Version::parse("2.0").unwrap();
                let _ = tx.send(extract_executable(&dpkg, &deb, &target, &version));
            });

            let path = rx
                .recv_timeout(Duration::from_secs(30))
                .expect("extraction did not finish")
                .unwrap();
            assert_eq!(path, bin.join("2.0"));
            assert!(fs::read_to_string(&path).unwrap().contains("pandoc 2.0"));
        }

        #[test]
        fn test_extract_into_missing_bin_dir() {
            let temp = tempfile::tempdir().unwrap();
            let dpkg = noisy_dpkg(temp.path());
            let deb = temp.path().join("pandoc.deb");
            fs::write(&deb, deb_payload_tar(b"x")).unwrap();

            let err = extract_executable(
                &dpkg,
                &deb,
                &temp.path().join("missing"),
                &Version::parse("2.0").unwrap(),
            )
            .unwrap_err();
            assert!(matches!(err, PandoclabError::IoError { .. }));
        }
    }
}
