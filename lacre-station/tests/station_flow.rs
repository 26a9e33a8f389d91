//! End-to-end station flows against a recording transport

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lacre_printer::{ConnectResult, SendError, SendResult, Transport};
use lacre_station::{
    LabelBatch, LabelId, LabelTemplate, MemorySink, PrintOrchestrator, Severity, Station,
};

/// Fake transport that records every payload it is asked to send
#[derive(Clone, Default)]
struct RecordingTransport {
    connected: Arc<Mutex<bool>>,
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn connect(&mut self) -> ConnectResult<()> {
        *self.connected.lock().unwrap() = true;
        Ok(())
    }

    async fn send(&mut self, zpl: &str) -> SendResult<()> {
        if !*self.connected.lock().unwrap() {
            return Err(SendError::NotConnected);
        }
        self.sent.lock().unwrap().push(zpl.to_string());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }
}

fn station(template: LabelTemplate) -> (Station, RecordingTransport, Arc<MemorySink>) {
    let transport = RecordingTransport::default();
    let sink = Arc::new(MemorySink::new());
    let orchestrator = PrintOrchestrator::new(Box::new(transport.clone()), template);
    (
        Station::new(orchestrator, sink.clone(), 50),
        transport,
        sink,
    )
}

#[tokio::test]
async fn print_all_issues_exactly_one_send_in_batch_order() {
    let (mut station, transport, _sink) = station(LabelTemplate::Process);

    assert!(station.generate("9001941457766", 3));
    assert!(station.connect().await);
    assert!(station.print_all().await);

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);

    let template = LabelTemplate::Process;
    let expected: Vec<String> = (1..=3)
        .map(|i| template.render(&LabelId::format("9001941457766", i)))
        .collect();
    assert_eq!(sent[0], expected.join("\n"));
}

#[tokio::test]
async fn download_artifact_matches_print_payload() {
    let (mut station, transport, _sink) = station(LabelTemplate::Process);
    let dir = tempfile::tempdir().unwrap();

    assert!(station.generate("9001941457766", 5));
    let path = station.download(dir.path()).await.unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "9001941457766-etiquetas.txt"
    );

    assert!(station.connect().await);
    assert!(station.print_all().await);

    let written = std::fs::read(&path).unwrap();
    let sent = transport.sent.lock().unwrap();
    assert_eq!(written, sent[0].as_bytes());
}

#[tokio::test]
async fn reprint_batch_downloads_under_generic_name() {
    let (mut station, _transport, _sink) = station(LabelTemplate::Mailer);
    let dir = tempfile::tempdir().unwrap();

    assert!(station.prepare_reprint("a\n\nb\n  \nc"));
    let ids: Vec<&str> = station.batch().labels().iter().map(|l| l.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    let path = station.download(dir.path()).await.unwrap();
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), "etiquetas.txt");

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("^JZN\n^XA\n"));
    assert_eq!(written.matches("^XZ").count(), 3);
}

#[tokio::test]
async fn print_without_connect_fails_and_keeps_batch() {
    let (mut station, transport, sink) = station(LabelTemplate::Process);

    assert!(station.generate("X", 2));
    sink.drain();

    assert!(!station.print_all().await);
    assert!(transport.sent.lock().unwrap().is_empty());
    assert_eq!(station.batch().len(), 2);

    let published = sink.drain();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].severity, Severity::Error);
}

#[tokio::test]
async fn print_one_sends_a_single_block() {
    let (mut station, transport, _sink) = station(LabelTemplate::Process);

    assert!(station.connect().await);
    assert!(station.print_one(&LabelId::format("X", 7)).await);

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], LabelTemplate::Process.render(&LabelId::format("X", 7)));
}

#[tokio::test]
async fn every_action_publishes_exactly_one_notification() {
    let (mut station, _transport, sink) = station(LabelTemplate::Process);
    let dir = tempfile::tempdir().unwrap();

    station.generate("X", 2);
    station.generate("", 2);
    station.connect().await;
    station.print_all().await;
    station.download(dir.path()).await;
    station.clear();
    station.prepare_reprint("");

    assert_eq!(sink.drain().len(), 7);
}

#[tokio::test]
async fn batch_generation_validates_against_builder() {
    // A batch built directly and one built through the station agree
    let direct = LabelBatch::generate("9001941457766", 4, 50).unwrap();
    let (mut station, _transport, _sink) = station(LabelTemplate::Process);
    assert!(station.generate("9001941457766", 4));
    assert_eq!(station.batch(), &direct);
}
