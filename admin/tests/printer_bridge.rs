//! Printer bridge over recording devices.

use arenaticket_admin::mocks::RecordingHost;
use arenaticket_admin::printer::{PrinterBridge, PrinterKind};
use arenaticket_admin::AdminError;
use arenaticket_client::types::SoldTicket;
use arenaticket_core::environment::Clock;
use arenaticket_testing::test_clock;
use std::sync::Arc;
use std::time::Duration;

const SUNMI_UA: &str = "Mozilla/5.0 (Linux; Android 7.1.1; V2s Build/NMF26F)";

fn sold(code: &str, price: f64) -> SoldTicket {
    SoldTicket {
        code: code.into(),
        event: "Final da Taça".into(),
        event_date: "2025-06-14T18:00:00".into(),
        batch: "Bancada Norte".into(),
        price,
        buyer_name: "Rui Manuel".into(),
    }
}

fn bridge(host: &RecordingHost) -> PrinterBridge {
    PrinterBridge::new(Arc::new(host.clone()), PrinterKind::DEFAULT_ORDER.to_vec())
        .with_pause(Duration::from_millis(1))
}

#[test]
fn test_first_present_kind_in_order_wins() {
    let host = RecordingHost::with_kinds(&[PrinterKind::AndroidWrapper, PrinterKind::Legacy]);
    let bridge = bridge(&host);

    let device = bridge.detect();

    assert_eq!(device.map(|d| d.kind()), Some(PrinterKind::AndroidWrapper));
    assert_eq!(host.probes(), vec![PrinterKind::LineApi, PrinterKind::AndroidWrapper]);
}

#[test]
fn test_missing_printer_is_reported() {
    let host = RecordingHost::with_kinds(&[]);
    let bridge = bridge(&host);

    assert!(!bridge.is_available());
    assert_eq!(bridge.device_info(SUNMI_UA), "Não detectado");
    assert!(matches!(
        bridge.print_ticket(&sold("T1", 5000.0)),
        Err(AdminError::DeviceUnavailable(_))
    ));
    assert_eq!(host.probes()[..3], PrinterKind::DEFAULT_ORDER);
}

#[test]
fn test_device_info_reads_terminal_model() {
    let bridge = bridge(&RecordingHost::with_kinds(&[PrinterKind::LineApi]));
    assert_eq!(bridge.device_info(SUNMI_UA), "SUNMI V2s");
    assert_eq!(bridge.device_info("Android 9; T2 Build"), "SUNMI T2");
    assert_eq!(bridge.device_info("Firefox"), "SUNMI (modelo desconhecido)");
}

#[tokio::test]
async fn test_empty_batch_is_refused() {
    let host = RecordingHost::with_kinds(&[PrinterKind::LineApi]);
    let outcome = bridge(&host).print_tickets(&[]).await;

    assert!(matches!(outcome, Err(AdminError::InvalidInput(_))));
    assert!(host.printed().is_empty());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_batch_prints_every_ticket_in_order() {
    let host = RecordingHost::with_kinds(&[PrinterKind::Legacy]);
    let tickets = [sold("T1", 5000.0), sold("T2", 5000.0), sold("T3", 7500.0)];

    bridge(&host).print_tickets(&tickets).await.unwrap();

    let printed = host.printed();
    assert_eq!(printed.len(), 3);
    for ((kind, doc), ticket) in printed.iter().zip(&tickets) {
        assert_eq!(*kind, PrinterKind::Legacy);
        assert!(doc.lines().any(|line| line == ticket.code));
    }
}

#[tokio::test]
async fn test_batch_stops_at_first_failure() {
    let host = RecordingHost::with_kinds(&[PrinterKind::LineApi]).failing();
    let outcome = bridge(&host)
        .print_tickets(&[sold("T1", 5000.0), sold("T2", 5000.0)])
        .await;

    assert_eq!(outcome, Err(AdminError::PrintFailed("paper jam".into())));
    assert!(host.printed().is_empty());
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_receipt_summarizes_sale() {
    let host = RecordingHost::with_kinds(&[PrinterKind::LineApi]);
    let at = test_clock().now();

    bridge(&host)
        .print_receipt(&[sold("T1", 5000.0), sold("T2", 7500.0)], "DINHEIRO", "Portão 3", at)
        .unwrap();

    let printed = host.printed();
    let lines: Vec<&str> = printed[0].1.lines().collect();
    assert!(lines.contains(&"RECIBO DE VENDA"));
    assert!(lines.contains(&"Quantidade: 2 bilhete(s)"));
    assert!(lines.contains(&"Pagamento: DINHEIRO"));
    assert!(lines.contains(&"Ponto: Portão 3"));
}

#[test]
fn test_drawer_is_best_effort() {
    let android = RecordingHost::with_kinds(&[PrinterKind::AndroidWrapper]);
    bridge(&android).open_drawer();
    assert!(android.drawer_kicks().is_empty());

    let line = RecordingHost::with_kinds(&[PrinterKind::LineApi]);
    bridge(&line).open_drawer();
    assert_eq!(line.drawer_kicks(), vec![PrinterKind::LineApi]);

    let none = RecordingHost::with_kinds(&[]);
    bridge(&none).open_drawer();
    assert!(none.drawer_kicks().is_empty());
}
