//! Test doubles shared by the driver's test suites.

pub mod fakes;

/// Route driver logs to the test output. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
