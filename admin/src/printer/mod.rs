//! Receipt and ticket printing on point-of-sale terminals.
//!
//! A terminal may expose one of several print APIs. [`PrinterBridge`] probes
//! them in a configured order, uses the first one present, and renders the
//! same logical [`PrintDocument`] through it. Having no printer is a normal,
//! reported condition.

pub mod bridge;
pub mod device;
pub mod document;
pub mod escpos;
pub mod format;

pub use bridge::PrinterBridge;
pub use device::{ConfiguredHost, DeviceHost, EscPosDevice, PrinterDevice, PrinterKind};
pub use document::{
    receipt_document, ticket_document, Align, PrintDocument, PrintOp, QrErrorLevel, TextStyle,
};
pub use format::{format_currency, format_date, format_instant, truncate};
