#![forbid(unsafe_code)]

//! Log output of the lesson shell, captured through a `fmt` subscriber that
//! writes into memory.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sizer_core::event::{Event, KeyCode};
use sizer_lessons::app::AppModel;
use sizer_lessons::lessons::LessonId;
use sizer_runtime::ProgramSimulator;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuf {
    type Writer = SharedBuf;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(level: Level, f: impl FnOnce()) -> String {
    let buf = SharedBuf::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_max_level(level)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    buf.text()
}

#[test]
fn toggle_and_switch_are_logged_at_info() {
    let logs = capture(Level::INFO, || {
        let mut sim = ProgramSimulator::new(AppModel::new(LessonId::AutoResize));
        sim.init();
        sim.inject_event(Event::char('p'));
        sim.advance(Duration::from_millis(1000));
        sim.inject_event(Event::key(KeyCode::Tab));
        sim.inject_event(Event::char('q'));
    });
    assert!(logs.contains("lessons started"), "{logs}");
    assert!(logs.contains("auto mode toggled"));
    assert!(logs.contains("auto=true"));
    assert!(logs.contains("lesson switched"));
    assert!(logs.contains("to=prop-drilling"));
    assert!(logs.contains("quitting"));
    assert!(!logs.contains("auto resize tick"), "ticks stay at trace");
}

#[test]
fn ticks_are_logged_at_trace() {
    let logs = capture(Level::TRACE, || {
        let mut sim = ProgramSimulator::new(AppModel::new(LessonId::AutoResize));
        sim.init();
        sim.inject_event(Event::char('p'));
        sim.advance(Duration::from_millis(2000));
    });
    assert_eq!(logs.matches("auto resize tick").count(), 2, "{logs}");
    assert!(logs.contains("after=500"));
}
