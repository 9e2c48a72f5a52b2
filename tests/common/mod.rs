//! Common test utilities and helpers
//!
//! Stylesheet fixture creation and the binary under test

pub mod fixtures;

/// Binary under test
#[allow(dead_code)]
pub fn bin() -> assert_cmd::Command {
    assert_cmd::Command::new(env!("CARGO_BIN_EXE_css-datauri"))
}
