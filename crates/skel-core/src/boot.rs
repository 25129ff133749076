//! Init hook run once by the firmware entry point

use log::info;

use crate::event::{EventCallback, EventDispatcher};

/// Versions printed at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub firmware_version: &'static str,
    pub sdk_version: &'static str,
}

impl BuildInfo {
    pub const fn new(firmware_version: &'static str, sdk_version: &'static str) -> Self {
        Self {
            firmware_version,
            sdk_version,
        }
    }
}

/// Print version info and install the Wi-Fi event callback.
///
/// Everything else (tasks, peripherals) is set up by the caller after this returns.
pub fn user_init(build: &BuildInfo, events: &EventDispatcher, handler: EventCallback) {
    info!("SDK version: {}", build.sdk_version);
    info!("Firmware version: {}", build.firmware_version);
    events.install(handler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SystemEvent;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, Once};

    static CALLS: AtomicUsize = AtomicUsize::new(0);
    static EVENTS: EventDispatcher = EventDispatcher::new();

    /// Messages logged so far, each with whether `EVENTS` had a handler at that point.
    static RECORDS: Mutex<Vec<(String, bool)>> = Mutex::new(Vec::new());
    static LOGGER_INIT: Once = Once::new();

    struct RecordingLogger;

    impl log::Log for RecordingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            let entry = (record.args().to_string(), EVENTS.is_installed());
            RECORDS.lock().unwrap().push(entry);
        }

        fn flush(&self) {}
    }

    static LOGGER: RecordingLogger = RecordingLogger;

    fn init_logger() {
        LOGGER_INIT.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    fn counting_handler(_event: &SystemEvent) {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_user_init_logs_versions_then_installs_handler() {
        init_logger();
        let build = BuildInfo::new("0.1.0", "esp-hal 1.0");

        user_init(&build, &EVENTS, counting_handler);
        assert!(EVENTS.is_installed());

        let records = RECORDS.lock().unwrap();
        let sdk = records
            .iter()
            .find(|(message, _)| message == "SDK version: esp-hal 1.0")
            .expect("SDK version was not logged");
        assert!(!sdk.1, "handler was installed before the SDK version was logged");
        assert!(
            records
                .iter()
                .any(|(message, _)| message == "Firmware version: 0.1.0")
        );
    }

    #[test]
    fn test_user_init_installs_handler() {
        let events = EventDispatcher::new();
        let build = BuildInfo::new("0.1.0", "host");

        user_init(&build, &events, counting_handler);
        assert!(events.is_installed());

        let before = CALLS.load(Ordering::SeqCst);
        assert!(events.dispatch(&SystemEvent::StaDhcpTimeout));
        assert_eq!(CALLS.load(Ordering::SeqCst), before + 1);
    }
}
