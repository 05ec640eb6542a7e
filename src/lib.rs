//! P-Box TX Gain control-surface plugin
//!
//! Maps key presses and dial rotations on a control surface to TX volume
//! levels (dB) on a P-Box audio-over-IP device.
//!
//! This library provides:
//! - Long-press / short-press resolution per control
//! - Volume updates over the device HTTP API with bearer auth
//! - Key and dial handlers reacting to host events
//! - Level rendering for keys and dial feedback

pub mod actions;
pub mod config;
pub mod device;
pub mod display;
pub mod host;
pub mod logging;
pub mod plugin;
pub mod press;
pub mod settings;

pub use plugin::{Plugin, TXGAIN_ACTION};
