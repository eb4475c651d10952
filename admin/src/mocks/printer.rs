//! Recording print devices.

use crate::error::{AdminError, Result};
use crate::printer::{DeviceHost, PrintDocument, PrinterDevice, PrinterKind};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Journal {
    probes: Vec<PrinterKind>,
    printed: Vec<(PrinterKind, PrintDocument)>,
    drawer_kicks: Vec<PrinterKind>,
}

/// Host that reports a fixed set of kinds and records everything sent.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    present: HashSet<PrinterKind>,
    failing: bool,
    journal: Arc<Mutex<Journal>>,
}

impl RecordingHost {
    /// Host where exactly `present` answer the probe.
    #[must_use]
    pub fn with_kinds(present: &[PrinterKind]) -> Self {
        Self {
            present: present.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Make every print job fail.
    #[must_use]
    pub const fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Kinds probed so far, in order.
    #[must_use]
    pub fn probes(&self) -> Vec<PrinterKind> {
        self.lock().probes.clone()
    }

    /// Documents printed so far with the kind that printed them.
    #[must_use]
    pub fn printed(&self) -> Vec<(PrinterKind, PrintDocument)> {
        self.lock().printed.clone()
    }

    /// Drawer pulses sent so far.
    #[must_use]
    pub fn drawer_kicks(&self) -> Vec<PrinterKind> {
        self.lock().drawer_kicks.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceHost for RecordingHost {
    fn probe(&self, kind: PrinterKind) -> Option<Arc<dyn PrinterDevice>> {
        self.lock().probes.push(kind);
        self.present.contains(&kind).then(|| {
            Arc::new(RecordingPrinter {
                kind,
                failing: self.failing,
                journal: Arc::clone(&self.journal),
            }) as Arc<dyn PrinterDevice>
        })
    }
}

/// Device handed out by [`RecordingHost`].
#[derive(Debug)]
pub struct RecordingPrinter {
    kind: PrinterKind,
    failing: bool,
    journal: Arc<Mutex<Journal>>,
}

impl PrinterDevice for RecordingPrinter {
    fn kind(&self) -> PrinterKind {
        self.kind
    }

    fn print(&self, doc: &PrintDocument) -> Result<()> {
        if self.failing {
            return Err(AdminError::PrintFailed("paper jam".to_string()));
        }
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .printed
            .push((self.kind, doc.clone()));
        Ok(())
    }

    fn open_drawer(&self) -> Result<()> {
        if !self.kind.supports_drawer() {
            return Err(AdminError::DeviceUnavailable(format!(
                "{} printer has no cash drawer",
                self.kind
            )));
        }
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drawer_kicks
            .push(self.kind);
        Ok(())
    }
}
