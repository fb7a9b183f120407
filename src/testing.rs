//! Thread-local log of executed passes.
use std::cell::RefCell;

thread_local!(static TEST_LOGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) });

pub fn log_message(msg: &str) {
    TEST_LOGS.with(|f| {
        let mut logs = f.borrow_mut();
        logs.push(msg.to_string());
    });
}

pub fn logs_contain(msg: &str) -> bool {
    TEST_LOGS.with(|f| {
        let logs = f.borrow();
        logs.iter().any(|line| line.contains(msg))
    })
}

/// Returns all messages logged by current thread and clears the log.
pub fn take_logs() -> Vec<String> {
    TEST_LOGS.with(|f| f.take())
}

pub fn clear_log() {
    TEST_LOGS.with(|f| {
        let mut logs = f.borrow_mut();
        logs.clear();
    })
}
