//! Runtime configuration.
//!
//! Values come from the environment (after `.env` is loaded by the binary)
//! and can be overridden with the `with_*` builders.

use crate::constants::DEFAULT_POINT_OF_SALE;
use crate::error::Result;
use crate::printer::{ConfiguredHost, PrinterKind};
use arenaticket_client::DEFAULT_BASE_URL;
use std::collections::HashMap;
use std::path::PathBuf;

/// API base URL variable.
pub const API_BASE_URL_ENV: &str = "ARENATICKET_API_BASE_URL";
/// Session storage file variable.
pub const STORAGE_PATH_ENV: &str = "ARENATICKET_STORAGE_PATH";
/// Printer probe order variable.
pub const PRINTER_ORDER_ENV: &str = "ARENATICKET_PRINTER_ORDER";
/// Receipt point-of-sale name variable.
pub const POINT_OF_SALE_ENV: &str = "ARENATICKET_POINT_OF_SALE";

/// Staff client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API base URL, without trailing slash
    pub api_base_url: String,
    /// Session storage file
    pub storage_path: PathBuf,
    /// Printer probe order
    pub printer_order: Vec<PrinterKind>,
    /// Device path per printer kind
    pub printer_devices: HashMap<PrinterKind, PathBuf>,
    /// Name printed on receipts
    pub point_of_sale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            storage_path: default_storage_path(),
            printer_order: PrinterKind::DEFAULT_ORDER.to_vec(),
            printer_devices: HashMap::new(),
            point_of_sale: DEFAULT_POINT_OF_SALE.to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidInput` if the printer order names an
    /// unknown kind.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, so tests need not touch the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = present(API_BASE_URL_ENV) {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(path) = present(STORAGE_PATH_ENV) {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(order) = present(PRINTER_ORDER_ENV) {
            config.printer_order = parse_printer_order(&order)?;
        }
        for kind in PrinterKind::DEFAULT_ORDER {
            if let Some(path) = present(&device_env(kind)) {
                config.printer_devices.insert(kind, PathBuf::from(path));
            }
        }
        if let Some(name) = present(POINT_OF_SALE_ENV) {
            config.point_of_sale = name.trim().to_string();
        }

        tracing::debug!(
            api = %config.api_base_url,
            storage = %config.storage_path.display(),
            printers = ?config.printer_order,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the session storage file.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the printer probe order.
    #[must_use]
    pub fn with_printer_order(mut self, order: Vec<PrinterKind>) -> Self {
        self.printer_order = order;
        self
    }

    /// Register a device path for `kind`.
    #[must_use]
    pub fn with_printer_device(mut self, kind: PrinterKind, path: impl Into<PathBuf>) -> Self {
        self.printer_devices.insert(kind, path.into());
        self
    }

    /// Set the receipt point-of-sale name.
    #[must_use]
    pub fn with_point_of_sale(mut self, name: impl Into<String>) -> Self {
        self.point_of_sale = name.into();
        self
    }

    /// Device host built from the configured paths.
    #[must_use]
    pub fn printer_host(&self) -> ConfiguredHost {
        self.printer_devices
            .iter()
            .fold(ConfiguredHost::new(), |host, (kind, path)| {
                host.with_device(*kind, path.clone())
            })
    }
}

/// Parse a comma-separated probe order such as `line,legacy`.
///
/// Blank entries are skipped and repeated kinds keep their first position.
///
/// # Errors
///
/// Returns `AdminError::InvalidInput` for an unknown kind.
pub fn parse_printer_order(raw: &str) -> Result<Vec<PrinterKind>> {
    let mut order = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind: PrinterKind = name.parse()?;
        if !order.contains(&kind) {
            order.push(kind);
        }
    }
    Ok(order)
}

/// Variable holding the device path for `kind`.
#[must_use]
pub fn device_env(kind: PrinterKind) -> String {
    format!("ARENATICKET_PRINTER_{}_DEVICE", kind.as_str().to_uppercase())
}

fn default_storage_path() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".arenaticket")
        .join("storage.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AdminError;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.printer_order, PrinterKind::DEFAULT_ORDER.to_vec());
        assert_eq!(config.point_of_sale, "Bilheteira");
        assert!(config.storage_path.ends_with(".arenaticket/storage.json"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("ARENATICKET_API_BASE_URL", "https://api.arena.ao/api/v1/"),
            ("ARENATICKET_PRINTER_ORDER", "legacy, line"),
            ("ARENATICKET_PRINTER_LEGACY_DEVICE", "/dev/usb/lp0"),
            ("ARENATICKET_POINT_OF_SALE", "Portão 2"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.arena.ao/api/v1");
        assert_eq!(config.printer_order, vec![PrinterKind::Legacy, PrinterKind::LineApi]);
        assert_eq!(
            config.printer_devices.get(&PrinterKind::Legacy),
            Some(&PathBuf::from("/dev/usb/lp0"))
        );
        assert_eq!(config.point_of_sale, "Portão 2");
    }

    #[test]
    fn unknown_printer_kind_is_rejected() {
        assert!(matches!(
            parse_printer_order("line,bluetooth"),
            Err(AdminError::InvalidInput(_))
        ));
        assert_eq!(
            parse_printer_order("line,,line").unwrap(),
            vec![PrinterKind::LineApi]
        );
    }

    #[test]
    fn device_variables_follow_kind_names() {
        assert_eq!(device_env(PrinterKind::LineApi), "ARENATICKET_PRINTER_LINE_DEVICE");
        assert_eq!(
            device_env(PrinterKind::AndroidWrapper),
            "ARENATICKET_PRINTER_ANDROID_DEVICE"
        );
    }
}
