//! Host capability surface
//!
//! The host runtime owns rendering, input delivery and settings storage.
//! Handlers only see it through [`ActionContext`], so the same logic runs
//! against the real host connection, the probe CLI, or a test double.

pub mod events;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::settings::{ControlSettings, MAX_DB, MIN_DB};

pub use events::HostEvent;
pub use memory::MemoryContext;

/// Physical control type an action instance is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Controller {
    #[default]
    Keypad,
    Encoder,
}

/// Value pushed to a dial's touch strip after a level change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialFeedback {
    /// Text shown next to the dial, e.g. "-12dB"
    pub value: String,
    /// Bar position 0..=100 across the device range
    pub indicator: u8,
}

impl DialFeedback {
    pub fn for_level(level: i32) -> Self {
        let span = (MAX_DB - MIN_DB) as i64;
        let offset = (level.clamp(MIN_DB, MAX_DB) - MIN_DB) as i64;
        Self {
            value: format!("{}dB", level),
            indicator: (offset * 100 / span) as u8,
        }
    }
}

/// Capabilities the host grants to a single placed action instance
#[async_trait]
pub trait ActionContext: Send + Sync {
    /// Opaque identity of the control (host "context")
    fn id(&self) -> &str;

    /// Whether this instance sits on a key or a dial
    fn controller(&self) -> Controller;

    async fn get_settings(&self) -> Result<ControlSettings>;

    async fn set_settings(&self, settings: &ControlSettings) -> Result<()>;

    /// Replace the rendered image (data URI)
    async fn set_image(&self, image: &str) -> Result<()>;

    /// Update the dial feedback surface. Keys ignore this.
    async fn set_feedback(&self, feedback: &DialFeedback) -> Result<()>;

    /// Flash the host's non-blocking failure indicator
    async fn show_alert(&self) -> Result<()>;
}

/// Context handle shared between a callback and any timer it arms
pub type SharedContext = Arc<dyn ActionContext>;
