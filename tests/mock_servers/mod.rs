//! Mock servers for integration testing
//!
//! Simulates the P-Box HTTP API so the plugin can be exercised end to end
//! without real hardware.

pub mod pbox;

pub use pbox::MockPbox;
