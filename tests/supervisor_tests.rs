use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use unolcd::core::TransportError;
use unolcd::{FnProvider, Provider, RunConfig, StopHandle, Supervisor, DEFAULT_BACKOFF};
use unolcd_testing::{ManualClock, ScriptedConnector, VirtualTerminal};

fn config(auto_reconnect: bool) -> RunConfig {
    let provider: Box<dyn Provider> = Box::new(FnProvider::new("hello", "Hello", || vec!["Hello".into()]));
    RunConfig::new(vec![provider], 1.0, 10)
        .unwrap()
        .with_auto_reconnect(auto_reconnect)
}

fn open_failure() -> TransportError {
    TransportError::Open {
        target: "virtual".into(),
        source: "no such device".into(),
    }
}

/// Collects status messages as strings.
fn recorder() -> (Rc<RefCell<Vec<String>>>, impl FnMut(unolcd::Status<'_>)) {
    let log = Rc::new(RefCell::new(vec![]));
    let sink = log.clone();
    (log, move |status: unolcd::Status<'_>| sink.borrow_mut().push(status.to_string()))
}

#[test]
fn failure_followed_by_single_backoff() {
    let stop = StopHandle::new();
    let clock = ManualClock::new().stop_after(2, stop.clone());
    let connector = ScriptedConnector::new("virtual", vec![Err(open_failure()), Ok(VirtualTerminal::new(16, 2))]);

    let mut supervisor = Supervisor::new(connector, config(true)).with_clock(clock.clone());
    supervisor.run(&stop).unwrap();

    assert_eq!(2, supervisor.connector().attempts());
    assert_eq!(vec![DEFAULT_BACKOFF, Duration::from_secs(1)], clock.sleeps());
}

#[test]
fn no_retry_when_disabled() {
    let stop = StopHandle::new();
    let clock = ManualClock::new();
    let connector = ScriptedConnector::new("virtual", vec![Err(open_failure()), Ok(VirtualTerminal::new(16, 2))]);
    let (log, callback) = recorder();

    let mut supervisor = Supervisor::new(connector, config(false))
        .with_clock(clock.clone())
        .on_status(callback);
    let result = supervisor.run(&stop);

    assert!(matches!(result, Err(TransportError::Open { .. })));
    assert_eq!(1, supervisor.connector().attempts());
    assert!(clock.sleeps().is_empty());
    assert_eq!(
        vec!["Connecting to virtual", "Disconnected from virtual", "Stopped"],
        *log.borrow()
    );
}

#[test]
fn reconnect_repeats_handshake() {
    let stop = StopHandle::new();
    // Backoff, then one frame on the second terminal.
    let clock = ManualClock::new().stop_after(2, stop.clone());
    let first = Rc::new(RefCell::new(VirtualTerminal::new(16, 2).disconnect_after(2)));
    let second = Rc::new(RefCell::new(VirtualTerminal::new(20, 4)));
    let connector = ScriptedConnector::new("virtual", vec![Ok(first.clone()), Ok(second.clone())]);
    let (log, callback) = recorder();

    let mut supervisor = Supervisor::new(connector, config(true))
        .with_clock(clock)
        .on_status(callback);
    supervisor.run(&stop).unwrap();

    assert_eq!(
        vec![
            "Connecting to virtual",
            "Disconnected from virtual",
            "Connecting to virtual",
            "Connected to virtual (20x4)",
            "Stopped",
        ],
        *log.borrow()
    );
    assert_eq!(1, second.borrow().resets());
    assert_eq!("Hello", second.borrow().line(0).trim_end());

    // Both transports were released by the supervisor.
    assert_eq!(1, Rc::strong_count(&first));
    assert_eq!(1, Rc::strong_count(&second));
}

#[test]
fn retries_without_limit() {
    let stop = StopHandle::new();
    let clock = ManualClock::new().stop_after(5, stop.clone());
    let connector = ScriptedConnector::<VirtualTerminal>::new("virtual", vec![]);

    let mut supervisor = Supervisor::new(connector, config(true))
        .with_clock(clock.clone())
        .with_backoff(Duration::from_millis(500));
    supervisor.run(&stop).unwrap();

    assert_eq!(5, supervisor.connector().attempts());
    assert_eq!(vec![Duration::from_millis(500); 5], clock.sleeps());
}

#[test]
fn stop_during_backoff_prevents_new_attempt() {
    let stop = StopHandle::new();
    let clock = ManualClock::new().stop_after(1, stop.clone());
    let connector = ScriptedConnector::new("virtual", vec![Err(open_failure()), Ok(VirtualTerminal::new(16, 2))]);

    let mut supervisor = Supervisor::new(connector, config(true)).with_clock(clock);
    supervisor.run(&stop).unwrap();

    assert_eq!(1, supervisor.connector().attempts());
    assert_eq!(1, supervisor.connector().remaining());
}

#[test]
fn stopped_before_start() {
    let stop = StopHandle::new();
    stop.stop();
    let connector = ScriptedConnector::new("virtual", vec![Ok(VirtualTerminal::new(16, 2))]);
    let (log, callback) = recorder();

    let mut supervisor = Supervisor::new(connector, config(true))
        .with_clock(ManualClock::new())
        .on_status(callback);
    supervisor.run(&stop).unwrap();

    assert_eq!(0, supervisor.connector().attempts());
    assert_eq!(vec!["Stopped"], *log.borrow());
}

#[test]
fn transport_released_after_stop() {
    let stop = StopHandle::new();
    let clock = ManualClock::new().stop_after(1, stop.clone());
    let device = Rc::new(RefCell::new(VirtualTerminal::new(16, 2)));
    let connector = ScriptedConnector::new("virtual", vec![Ok(device.clone())]);

    let mut supervisor = Supervisor::new(connector, config(false)).with_clock(clock);
    supervisor.run(&stop).unwrap();

    assert_eq!(1, Rc::strong_count(&device));
}

#[test]
fn provider_state_survives_reconnect() {
    let stop = StopHandle::new();
    let clock = ManualClock::new().stop_after(3, stop.clone());
    let mut count = 0;
    let counter: Box<dyn Provider> = Box::new(FnProvider::new("counter", "Counts", move || {
        count += 1;
        vec![count.to_string()]
    }));
    let config = RunConfig::new(vec![counter], 1.0, 10).unwrap().with_auto_reconnect(true);

    // The first terminal survives the handshake and one frame, then fails on the second frame.
    let first = VirtualTerminal::new(16, 1).disconnect_after(8);
    let second = Rc::new(RefCell::new(VirtualTerminal::new(16, 1)));
    let connector = ScriptedConnector::new(
        "virtual",
        vec![Ok(Rc::new(RefCell::new(first))), Ok(second.clone())],
    );

    let mut supervisor = Supervisor::new(connector, config).with_clock(clock.clone());
    supervisor.run(&stop).unwrap();

    // Frame 1 on the first terminal, frame 2 lost mid-write, then backoff and frame 3.
    assert_eq!(vec![Duration::from_secs(1), DEFAULT_BACKOFF, Duration::from_secs(1)], clock.sleeps());
    assert_eq!("3", second.borrow().line(0).trim_end());
}
