//! Fake executables and package payloads
//!
//! The fake pandoc is a `#!/bin/sh` script that prints a canned
//! `--version` report, answers the `--list-*` queries, and echoes stdin back
//! for conversions. `-f fail` makes a conversion fail with exit code 64.

use std::fs;
use std::path::{Path, PathBuf};

/// `pandoc --version` of a 1.x release (no user data directory, no list flags)
pub const PANDOC_1_12_REPORT: &str = "\
pandoc 1.12.4.2
Compiled with texmath 0.6.6.1, highlighting-kate 0.5.8.5.
Syntax highlighting is supported for the following languages:
    actionscript, ada, apache, bash, c, cpp, haskell, python
Copyright (C) 2006-2014 John MacFarlane
Web:  http://johnmacfarlane.net/pandoc
This is free software; see the source for copying conditions.
";

/// `pandoc --version` of 2.19.2
pub const PANDOC_2_19_REPORT: &str = "\
pandoc 2.19.2
Compiled with pandoc-types 1.22.2.1, texmath 0.12.5.2, skylighting 0.13,
citeproc 0.8.0.1, ipynb 0.2, hslua 2.2.1
Scripting engine: Lua 5.4
User data directory: /home/user/.local/share/pandoc
Copyright (C) 2006-2022 John MacFarlane. Web:  https://pandoc.org
This is free software; see the source for copying conditions. There is no
warranty, not even for merchantability or fitness for a particular purpose.
";

/// `pandoc --version` of a 3.x release (no "Compiled with" block)
pub const PANDOC_3_REPORT: &str = "\
pandoc 3.1.11
Features: +server +lua
Scripting engine: Lua 5.4
User data directory: /home/user/.local/share/pandoc
Copyright (C) 2006-2023 John MacFarlane. Web:  https://pandoc.org
";

/// Writes an executable file named `name` into `dir`
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_executable(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).expect("Failed to write executable");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }

    path
}

/// Writes a fake `pandoc` reporting `report` into `dir`
pub fn fake_pandoc(dir: &Path, report: &str) -> PathBuf {
    let script = format!(
        r#"#!/bin/sh
case "$1" in
  --version)
    cat <<'PANDOC_REPORT'
{report}PANDOC_REPORT
    ;;
  --list-input-formats) printf 'commonmark\ndocx\nhtml\nmarkdown\n' ;;
  --list-output-formats) printf 'docx\nhtml\nlatex\nmarkdown\n' ;;
  --list-highlight-languages) printf 'haskell\npython\nrust\n' ;;
  --list-extensions|--list-extensions=*) printf '+smart\n-emoji\n+footnotes\n' ;;
  -f)
    if [ "$2" = "fail" ]; then
      echo "Unknown input format fail" >&2
      exit 64
    fi
    cat
    ;;
  *)
    echo "unexpected arguments: $*" >&2
    exit 2
    ;;
esac
"#
    );
    write_executable(dir, "pandoc", &script)
}

/// Tar stream shaped like `dpkg --fsys-tarfile` output of a pandoc package
///
/// `./usr/bin/pandoc` holds `executable`.
pub fn deb_payload_tar(executable: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    let mut append = |path: &str, mode: u32, data: &[u8]| {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_entry_type(tar::EntryType::Regular);
        builder
            .append_data(&mut header, path, data)
            .expect("Failed to append tar entry");
    };

    append("./usr/share/doc/pandoc/copyright", 0o644, b"GPL-2+\n");
    append("./usr/bin/pandoc-server", 0o755, b"not pandoc\n");
    append("./usr/bin/pandoc", 0o755, executable);

    builder.into_inner().expect("Failed to finish tar stream")
}

/// Writes a fake `dpkg` whose `--fsys-tarfile` prints the package file as is
///
/// Pair with packages whose content is [`deb_payload_tar`] output.
pub fn fake_dpkg(dir: &Path) -> PathBuf {
    write_executable(
        dir,
        "dpkg",
        "#!/bin/sh\n[ \"$1\" = \"--fsys-tarfile\" ] || exit 2\nexec cat \"$2\"\n",
    )
}

/// Writes a `dpkg` like [`fake_dpkg`] that first floods stderr
///
/// The warnings exceed a pipe buffer, so callers must read stderr while
/// they read the tar stream.
pub fn noisy_dpkg(dir: &Path) -> PathBuf {
    write_executable(
        dir,
        "dpkg",
        "#!/bin/sh\n[ \"$1\" = \"--fsys-tarfile\" ] || exit 2\nhead -c 200000 /dev/zero | tr '\\0' w >&2\nexec cat \"$2\"\n",
    )
}

/// Writes a `dpkg` that rejects every package
pub fn failing_dpkg(dir: &Path) -> PathBuf {
    write_executable(
        dir,
        "dpkg",
        "#!/bin/sh\necho \"dpkg-deb: error: '$2' is not a Debian format archive\" >&2\nexit 2\n",
    )
}
