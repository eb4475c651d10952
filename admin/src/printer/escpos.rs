//! ESC/POS encoding of print documents.

use super::device::PrinterKind;
use super::document::{Align, PrintDocument, PrintOp, QrErrorLevel, TextStyle};
use crate::error::{AdminError, Result};

const INIT: &[u8] = &[0x1B, 0x40];
const CUT: &[u8] = &[0x1D, 0x56, 0x00];
const DRAWER_PULSE: &[u8] = &[0x1B, 0x70, 0x00, 0x19, 0xFA];
const EJECT_LINES: u8 = 4;

/// Cash-drawer kick pulse on pin 2.
#[must_use]
pub const fn drawer_pulse() -> &'static [u8] {
    DRAWER_PULSE
}

/// Encode `doc` in the dialect of `kind`.
///
/// # Errors
///
/// Returns `AdminError::InvalidInput` when a QR payload does not fit the
/// 16-bit length field of the store command.
pub fn encode(doc: &PrintDocument, kind: PrinterKind) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(512);
    out.extend_from_slice(INIT);

    for op in doc.ops() {
        match op {
            PrintOp::Text { text, style } => {
                push_style(&mut out, *style);
                out.extend_from_slice(text.as_bytes());
                out.push(b'\n');
            },
            PrintOp::QrCode { data, dot, level } => {
                push_qr(&mut out, data, *dot, level.unwrap_or_else(|| kind.qr_level()))?;
            },
            PrintOp::Feed(lines) => out.extend_from_slice(&[0x1B, 0x64, *lines]),
            PrintOp::Cut => out.extend_from_slice(CUT),
            PrintOp::AutoOut if kind.supports_auto_out() => {
                out.extend_from_slice(&[0x1B, 0x64, EJECT_LINES]);
            },
            PrintOp::AutoOut => {},
        }
    }

    Ok(out)
}

fn push_style(out: &mut Vec<u8>, style: TextStyle) {
    let align = match style.align {
        Align::Left => 0,
        Align::Center => 1,
        Align::Right => 2,
    };
    // ESC ! n: 0x10 double height, 0x20 double width
    let size = match style.size {
        28..=u8::MAX => 0x30,
        24..=27 => 0x10,
        _ => 0x00,
    };
    out.extend_from_slice(&[0x1B, 0x61, align]);
    out.extend_from_slice(&[0x1B, 0x21, size]);
    out.extend_from_slice(&[0x1B, 0x45, u8::from(style.bold)]);
    out.extend_from_slice(&[0x1B, 0x2D, u8::from(style.underline)]);
}

fn push_qr(out: &mut Vec<u8>, data: &str, dot: u8, level: QrErrorLevel) -> Result<()> {
    let level = match level {
        QrErrorLevel::L => 0x30,
        QrErrorLevel::M => 0x31,
        QrErrorLevel::Q => 0x32,
        QrErrorLevel::H => 0x33,
    };
    let bytes = data.as_bytes();
    // pL pH count the payload plus the three function bytes
    let stored = u16::try_from(bytes.len() + 3).map_err(|_| {
        AdminError::InvalidInput(format!("QR payload too large: {} bytes", bytes.len()))
    })?;
    let [p_l, p_h] = stored.to_le_bytes();

    out.extend_from_slice(&[0x1B, 0x61, 0x01]);
    // model 2
    out.extend_from_slice(&[0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);
    out.extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, dot]);
    out.extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, level]);
    out.extend_from_slice(&[0x1D, 0x28, 0x6B, p_l, p_h, 0x31, 0x50, 0x30]);
    out.extend_from_slice(bytes);
    out.extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);
    out.push(b'\n');
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn qr_doc() -> PrintDocument {
        PrintDocument::new().qr("AT-1", 8).finish()
    }

    #[test]
    fn qr_level_follows_device_dialect() {
        let level_cmd = |level: u8| [0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, level];
        assert!(contains(&encode(&qr_doc(), PrinterKind::LineApi).unwrap(), &level_cmd(0x33)));
        assert!(contains(&encode(&qr_doc(), PrinterKind::Legacy).unwrap(), &level_cmd(0x32)));
        assert!(contains(&encode(&qr_doc(), PrinterKind::AndroidWrapper).unwrap(), &level_cmd(0x31)));
    }

    #[test]
    fn only_line_api_ejects_paper() {
        let line = encode(&qr_doc(), PrinterKind::LineApi).unwrap();
        let legacy = encode(&qr_doc(), PrinterKind::Legacy).unwrap();
        assert!(line.ends_with(&[0x1D, 0x56, 0x00, 0x1B, 0x64, EJECT_LINES]));
        assert!(legacy.ends_with(CUT));
    }

    #[test]
    fn text_lines_are_styled_and_terminated() {
        let doc = PrintDocument::new().text("PRECO", TextStyle::new(Align::Left, 28).bold());
        let bytes = encode(&doc, PrinterKind::Legacy).unwrap();
        assert!(bytes.starts_with(INIT));
        assert!(contains(&bytes, &[0x1B, 0x21, 0x30]));
        assert!(contains(&bytes, &[0x1B, 0x45, 0x01]));
        assert!(bytes.ends_with(b"PRECO\n"));
    }

    #[test]
    fn qr_store_length_is_little_endian() {
        let data = "A".repeat(300);
        let doc = PrintDocument::new().qr(&data, 6).finish();
        let bytes = encode(&doc, PrinterKind::Legacy).unwrap();
        // 303 = 0x012F
        assert!(contains(&bytes, &[0x1D, 0x28, 0x6B, 0x2F, 0x01, 0x31, 0x50, 0x30]));
    }

    #[test]
    fn oversized_qr_is_rejected() {
        let data = "A".repeat(70_000);
        let doc = PrintDocument::new().qr(&data, 6).finish();
        assert!(matches!(
            encode(&doc, PrinterKind::LineApi),
            Err(AdminError::InvalidInput(_))
        ));

        let fits = "A".repeat(usize::from(u16::MAX) - 3);
        assert!(encode(&PrintDocument::new().qr(&fits, 6).finish(), PrinterKind::LineApi).is_ok());
    }
}
