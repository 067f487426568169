// Library crate for scoped-locale
// Exposes modules for binaries and integration testing

pub mod config;
pub mod i18n;
pub mod loader;
pub mod retry;
