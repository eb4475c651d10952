//! Print device capabilities and probing.

use super::document::{PrintDocument, QrErrorLevel};
use super::escpos;
use crate::error::{AdminError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Print APIs a point-of-sale terminal may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrinterKind {
    /// Modern line-oriented API
    LineApi,
    /// Custom Android wrapper app
    AndroidWrapper,
    /// Legacy printer API
    Legacy,
}

impl PrinterKind {
    /// Default probe order.
    pub const DEFAULT_ORDER: [Self; 3] = [Self::LineApi, Self::AndroidWrapper, Self::Legacy];

    /// Configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LineApi => "line",
            Self::AndroidWrapper => "android",
            Self::Legacy => "legacy",
        }
    }

    /// QR error level used when the document leaves it open.
    #[must_use]
    pub const fn qr_level(self) -> QrErrorLevel {
        match self {
            Self::LineApi => QrErrorLevel::H,
            Self::AndroidWrapper => QrErrorLevel::M,
            Self::Legacy => QrErrorLevel::Q,
        }
    }

    /// Whether the device can eject printed paper.
    #[must_use]
    pub const fn supports_auto_out(self) -> bool {
        matches!(self, Self::LineApi)
    }

    /// Whether the device drives a cash drawer.
    #[must_use]
    pub const fn supports_drawer(self) -> bool {
        matches!(self, Self::LineApi | Self::Legacy)
    }
}

impl std::fmt::Display for PrinterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrinterKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "lineapi" => Ok(Self::LineApi),
            "android" => Ok(Self::AndroidWrapper),
            "legacy" => Ok(Self::Legacy),
            other => Err(AdminError::InvalidInput(format!("unknown printer kind: {other}"))),
        }
    }
}

/// A print device that was found.
pub trait PrinterDevice: Send + Sync {
    /// Which API this device speaks.
    fn kind(&self) -> PrinterKind;

    /// Print a document.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::PrintFailed` if the device rejects the job and
    /// `AdminError::InvalidInput` if the document cannot be encoded.
    fn print(&self, doc: &PrintDocument) -> Result<()>;

    /// Kick the cash drawer.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::DeviceUnavailable` if the device has no drawer
    /// and `AdminError::PrintFailed` if the pulse cannot be sent.
    fn open_drawer(&self) -> Result<()>;
}

/// Source of print devices.
pub trait DeviceHost: Send + Sync {
    /// The device for `kind`, if present.
    fn probe(&self, kind: PrinterKind) -> Option<Arc<dyn PrinterDevice>>;
}

/// Host whose devices are character-device (or plain file) paths.
///
/// A kind is present when its configured path exists.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredHost {
    paths: HashMap<PrinterKind, PathBuf>,
}

impl ConfiguredHost {
    /// Host with no devices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the device path for `kind`.
    #[must_use]
    pub fn with_device(mut self, kind: PrinterKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }
}

impl DeviceHost for ConfiguredHost {
    fn probe(&self, kind: PrinterKind) -> Option<Arc<dyn PrinterDevice>> {
        let path = self.paths.get(&kind)?;
        let present = path.exists();
        tracing::debug!(%kind, path = %path.display(), present, "Printer probe");
        present.then(|| {
            Arc::new(EscPosDevice {
                kind,
                path: path.clone(),
            }) as Arc<dyn PrinterDevice>
        })
    }
}

/// Device that receives raw ESC/POS bytes through a path.
#[derive(Debug, Clone)]
pub struct EscPosDevice {
    kind: PrinterKind,
    path: PathBuf,
}

impl EscPosDevice {
    fn write(&self, bytes: &[u8]) -> Result<()> {
        std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(bytes))
            .map_err(|e| {
                tracing::error!(kind = %self.kind, path = %self.path.display(), error = %e, "Printer write failed");
                AdminError::PrintFailed(
                    "Falha na impressão. Verifique se a impressora está funcionando.".to_string(),
                )
            })
    }
}

impl PrinterDevice for EscPosDevice {
    fn kind(&self) -> PrinterKind {
        self.kind
    }

    fn print(&self, doc: &PrintDocument) -> Result<()> {
        self.write(&escpos::encode(doc, self.kind)?)
    }

    fn open_drawer(&self) -> Result<()> {
        if !self.kind.supports_drawer() {
            return Err(AdminError::DeviceUnavailable(format!(
                "{} printer has no cash drawer",
                self.kind
            )));
        }
        self.write(escpos::drawer_pulse())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_config_names() {
        assert_eq!("line".parse::<PrinterKind>().unwrap(), PrinterKind::LineApi);
        assert_eq!(" Android ".parse::<PrinterKind>().unwrap(), PrinterKind::AndroidWrapper);
        assert!("bluetooth".parse::<PrinterKind>().is_err());
    }

    #[test]
    fn configured_host_reports_existing_paths_only() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("lp0");
        std::fs::write(&present, b"").unwrap();

        let host = ConfiguredHost::new()
            .with_device(PrinterKind::Legacy, &present)
            .with_device(PrinterKind::LineApi, dir.path().join("missing"));

        assert!(host.probe(PrinterKind::LineApi).is_none());
        assert!(host.probe(PrinterKind::AndroidWrapper).is_none());
        let device = host.probe(PrinterKind::Legacy).unwrap();
        assert_eq!(device.kind(), PrinterKind::Legacy);

        device.print(&PrintDocument::new().feed(1)).unwrap();
        device.open_drawer().unwrap();
        let written = std::fs::read(&present).unwrap();
        assert!(written.ends_with(escpos::drawer_pulse()));
    }

    #[test]
    fn android_wrapper_has_no_drawer() {
        let dir = tempfile::tempdir().unwrap();
        let device = EscPosDevice {
            kind: PrinterKind::AndroidWrapper,
            path: dir.path().join("android"),
        };
        assert!(matches!(device.open_drawer(), Err(AdminError::DeviceUnavailable(_))));
    }

    #[test]
    fn oversized_qr_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lp0");
        let device = EscPosDevice {
            kind: PrinterKind::Legacy,
            path: path.clone(),
        };
        let doc = PrintDocument::new().qr("X".repeat(70_000), 6).finish();

        assert!(matches!(device.print(&doc), Err(AdminError::InvalidInput(_))));
        assert!(!path.exists());
    }
}
