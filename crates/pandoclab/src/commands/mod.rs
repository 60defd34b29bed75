pub mod convert;
pub mod exec;
pub mod formats;
pub mod install;
pub mod releases;
pub mod version;
