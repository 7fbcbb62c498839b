//! Log records emitted while building a diagram.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

use trellis::DiagramBuilder;

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct Capture;

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        RECORDS
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

#[test]
fn test_parse_announced_once() {
    log::set_logger(&Capture).unwrap();
    log::set_max_level(LevelFilter::Trace);

    DiagramBuilder::default().parse("A [x: 1]\nB [x: 1]\nA -> B");

    let records = RECORDS.lock().unwrap();
    let announcements: Vec<_> = records
        .iter()
        .filter(|(level, message)| *level == Level::Info && message.starts_with("Parsing diagram"))
        .collect();
    assert_eq!(announcements.len(), 1, "{records:?}");
}
