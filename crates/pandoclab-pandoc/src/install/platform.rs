use pandoclab_core::Result;
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
use pandoclab_core::PandoclabError;
use std::fmt;

/// Architectures pandoc publishes Debian packages for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    /// Debian architecture name used in package file names
    pub fn deb_name(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.deb_name())
    }
}

pub fn detect_arch() -> Result<Arch> {
    #[cfg(target_arch = "x86_64")]
    return Ok(Arch::Amd64);

    #[cfg(target_arch = "aarch64")]
    return Ok(Arch::Arm64);

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    Err(PandoclabError::ConfigError(format!(
        "no pandoc package for architecture {}, pass an explicit arch",
        std::env::consts::ARCH
    )))
}

/// Package file name suffix for an architecture, e.g. `-amd64.deb`
pub fn asset_name_suffix(arch: &str) -> String {
    format!("-{}.deb", arch)
}

pub fn binary_name() -> &'static str {
    #[cfg(target_os = "windows")]
    return "pandoc.exe";

    #[cfg(not(target_os = "windows"))]
    return "pandoc";
}
