//! Device-independent print documents.
//!
//! A [`PrintDocument`] is the logical content of a ticket or receipt. Each
//! device turns it into its own command stream, applying its dialect (QR
//! error level, paper ejection).

use super::format::{format_currency, format_date, format_instant, truncate};
use arenaticket_client::types::SoldTicket;
use chrono::{DateTime, Utc};

const SEPARATOR: &str = "--------------------------------";
const LINE_WIDTH: usize = 32;

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left
    #[default]
    Left,
    /// Center
    Center,
    /// Right
    Right,
}

/// Text styling for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Alignment
    pub align: Align,
    /// Nominal size in points (18-32)
    pub size: u8,
    /// Bold
    pub bold: bool,
    /// Underline
    pub underline: bool,
}

impl TextStyle {
    /// Plain text at `size`.
    #[must_use]
    pub const fn new(align: Align, size: u8) -> Self {
        Self {
            align,
            size,
            bold: false,
            underline: false,
        }
    }

    /// Bold variant.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Underlined variant.
    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrErrorLevel {
    /// ~7%
    L,
    /// ~15%
    M,
    /// ~25%
    Q,
    /// ~30%
    H,
}

/// One print instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOp {
    /// A line of text (no trailing newline)
    Text {
        /// Content
        text: String,
        /// Style
        style: TextStyle,
    },
    /// Centered QR code
    QrCode {
        /// Encoded content
        data: String,
        /// Module size in dots
        dot: u8,
        /// Error level; `None` lets the device pick its default
        level: Option<QrErrorLevel>,
    },
    /// Blank lines
    Feed(u8),
    /// Paper cut
    Cut,
    /// Eject the printed paper (only some devices support it)
    AutoOut,
}

/// Ordered list of print instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintDocument {
    ops: Vec<PrintOp>,
}

impl PrintDocument {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text line.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>, style: TextStyle) -> Self {
        self.ops.push(PrintOp::Text {
            text: text.into(),
            style,
        });
        self
    }

    /// Append a QR code.
    #[must_use]
    pub fn qr(mut self, data: impl Into<String>, dot: u8) -> Self {
        self.ops.push(PrintOp::QrCode {
            data: data.into(),
            dot,
            level: None,
        });
        self
    }

    /// Append blank lines.
    #[must_use]
    pub fn feed(mut self, lines: u8) -> Self {
        self.ops.push(PrintOp::Feed(lines));
        self
    }

    /// Append a cut followed by paper ejection.
    #[must_use]
    pub fn finish(mut self) -> Self {
        self.ops.push(PrintOp::Cut);
        self.ops.push(PrintOp::AutoOut);
        self
    }

    /// Instructions in order.
    #[must_use]
    pub fn ops(&self) -> &[PrintOp] {
        &self.ops
    }

    /// Text lines only, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            PrintOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

fn label(text: &str) -> (String, TextStyle) {
    (text.to_string(), TextStyle::new(Align::Left, 20).bold())
}

/// Ticket handed to the buyer after an in-person sale.
#[must_use]
pub fn ticket_document(ticket: &SoldTicket) -> PrintDocument {
    let value = TextStyle::new(Align::Left, 24);
    let notice = TextStyle::new(Align::Center, 18);
    let field = |doc: PrintDocument, name: &str, content: String, style: TextStyle, gap: u8| {
        let (name, name_style) = label(name);
        doc.text(name, name_style).text(content, style).feed(gap)
    };

    let doc = PrintDocument::new()
        .text("ARENATICKET", TextStyle::new(Align::Center, 32).bold())
        .text("Seu Bilhete para a Diversao", TextStyle::new(Align::Center, 20))
        .feed(1)
        .text("CODIGO DO BILHETE", TextStyle::new(Align::Center, 20))
        .text(ticket.code.clone(), TextStyle::new(Align::Center, 28).bold().underline())
        .feed(1)
        .qr(ticket.code.clone(), 8)
        .feed(1)
        .text("Apresente este QR Code na entrada", notice)
        .feed(2);

    let doc = field(doc, "EVENTO", truncate(&ticket.event, LINE_WIDTH), value, 1);
    let doc = field(doc, "DATA E HORA", format_date(&ticket.event_date), value, 1);
    let doc = field(doc, "LOTE", ticket.batch.clone(), value, 1);
    let doc = field(
        doc,
        "PRECO",
        format_currency(ticket.price),
        TextStyle::new(Align::Left, 28).bold(),
        2,
    );
    let doc = field(doc, "COMPRADOR", truncate(&ticket.buyer_name, LINE_WIDTH), value, 2);

    doc.text(SEPARATOR, TextStyle::new(Align::Center, 20))
        .text("Bilhete valido para 1 pessoa", notice)
        .text("Nao e permitida a reproducao", notice)
        .text("Em caso de duvida, contacte:", notice)
        .text("suporte@arenaticket.gdse.ao", notice)
        .feed(3)
        .finish()
}

/// Sale summary for the point-of-sale copy.
#[must_use]
pub fn receipt_document(
    tickets: &[SoldTicket],
    payment_method: &str,
    point_of_sale: &str,
    at: DateTime<Utc>,
) -> PrintDocument {
    let total: f64 = tickets.iter().map(|t| t.price).sum();
    let left = |size| TextStyle::new(Align::Left, size);

    PrintDocument::new()
        .text("ARENATICKET", TextStyle::new(Align::Center, 28).bold())
        .text("RECIBO DE VENDA", TextStyle::new(Align::Center, 24).bold())
        .feed(1)
        .text(format!("Data: {}", format_instant(at)), left(20))
        .text(format!("Ponto: {point_of_sale}"), left(20))
        .feed(1)
        .text(SEPARATOR, left(20))
        .text(format!("Quantidade: {} bilhete(s)", tickets.len()), left(22))
        .text(format!("Total: {}", format_currency(total)), left(26).bold())
        .text(format!("Pagamento: {payment_method}"), left(22))
        .text(SEPARATOR, left(20))
        .feed(2)
        .text("Obrigado pela preferencia!", TextStyle::new(Align::Center, 20))
        .feed(4)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sold(code: &str, price: f64) -> SoldTicket {
        SoldTicket {
            code: code.into(),
            event: "Noite de Semba no Cine Atlântico com Convidados".into(),
            event_date: "2025-06-14T20:00:00".into(),
            batch: "Normal".into(),
            price,
            buyer_name: "Ana Luísa".into(),
        }
    }

    #[test]
    fn ticket_carries_code_qr_and_fields() {
        let doc = ticket_document(&sold("AT-0001", 5000.0));
        let lines: Vec<&str> = doc.lines().collect();

        assert_eq!(lines[0], "ARENATICKET");
        assert!(lines.contains(&"AT-0001"));
        assert!(lines.contains(&"14/06/2025 20:00"));
        assert!(lines.contains(&"5 000 Kz"));
        assert!(lines.contains(&"Noite de Semba no Cine Atlânt..."));
        assert!(doc.ops().iter().any(|op| matches!(
            op,
            PrintOp::QrCode { data, dot: 8, level: None } if data == "AT-0001"
        )));
        assert_eq!(doc.ops()[doc.ops().len() - 2..], [PrintOp::Cut, PrintOp::AutoOut]);
    }

    #[test]
    fn receipt_sums_ticket_prices() {
        let at = Utc.with_ymd_and_hms(2025, 6, 14, 17, 5, 0).single().unwrap_or_default();
        let doc = receipt_document(
            &[sold("A", 5000.0), sold("B", 7500.0)],
            "Dinheiro",
            "Bilheteira Norte",
            at,
        );
        let lines: Vec<&str> = doc.lines().collect();

        assert!(lines.contains(&"Data: 14/06/2025 18:05"));
        assert!(lines.contains(&"Ponto: Bilheteira Norte"));
        assert!(lines.contains(&"Quantidade: 2 bilhete(s)"));
        assert!(lines.contains(&"Total: 12 500 Kz"));
        assert!(lines.contains(&"Pagamento: Dinheiro"));
    }
}
