//! In-memory host context
//!
//! Records every call the handlers make. The probe CLI prints it back to the
//! operator, and tests assert against it.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use super::{ActionContext, Controller, DialFeedback};
use crate::settings::ControlSettings;

#[derive(Debug, Default)]
struct Recorded {
    settings: ControlSettings,
    settings_writes: usize,
    images: Vec<String>,
    feedback: Vec<DialFeedback>,
    alerts: usize,
}

/// Host stand-in holding settings and display state in memory
#[derive(Debug)]
pub struct MemoryContext {
    id: String,
    controller: Controller,
    recorded: Mutex<Recorded>,
}

impl MemoryContext {
    pub fn new(id: impl Into<String>, controller: Controller, settings: ControlSettings) -> Self {
        Self {
            id: id.into(),
            controller,
            recorded: Mutex::new(Recorded {
                settings,
                ..Default::default()
            }),
        }
    }

    pub fn keypad(id: impl Into<String>, settings: ControlSettings) -> Self {
        Self::new(id, Controller::Keypad, settings)
    }

    pub fn encoder(id: impl Into<String>, settings: ControlSettings) -> Self {
        Self::new(id, Controller::Encoder, settings)
    }

    fn with<T>(&self, f: impl FnOnce(&mut Recorded) -> T) -> T {
        let mut guard = self.recorded.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Settings as last written
    pub fn settings(&self) -> ControlSettings {
        self.with(|r| r.settings.clone())
    }

    pub fn settings_writes(&self) -> usize {
        self.with(|r| r.settings_writes)
    }

    pub fn images(&self) -> Vec<String> {
        self.with(|r| r.images.clone())
    }

    pub fn last_image(&self) -> Option<String> {
        self.with(|r| r.images.last().cloned())
    }

    pub fn feedback(&self) -> Vec<DialFeedback> {
        self.with(|r| r.feedback.clone())
    }

    pub fn alerts(&self) -> usize {
        self.with(|r| r.alerts)
    }
}

#[async_trait]
impl ActionContext for MemoryContext {
    fn id(&self) -> &str {
        &self.id
    }

    fn controller(&self) -> Controller {
        self.controller
    }

    async fn get_settings(&self) -> Result<ControlSettings> {
        Ok(self.settings())
    }

    async fn set_settings(&self, settings: &ControlSettings) -> Result<()> {
        self.with(|r| {
            r.settings = settings.clone();
            r.settings_writes += 1;
        });
        Ok(())
    }

    async fn set_image(&self, image: &str) -> Result<()> {
        self.with(|r| r.images.push(image.to_string()));
        Ok(())
    }

    async fn set_feedback(&self, feedback: &DialFeedback) -> Result<()> {
        self.with(|r| r.feedback.push(feedback.clone()));
        Ok(())
    }

    async fn show_alert(&self) -> Result<()> {
        self.with(|r| r.alerts += 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_host_calls() {
        let ctx = MemoryContext::encoder("dial", ControlSettings::default());
        assert_eq!(ctx.id(), "dial");
        assert_eq!(ctx.controller(), Controller::Encoder);

        let mut s = ctx.get_settings().await.unwrap();
        s.count = 9;
        ctx.set_settings(&s).await.unwrap();
        ctx.set_image("data:x").await.unwrap();
        ctx.set_feedback(&DialFeedback::for_level(9)).await.unwrap();
        ctx.show_alert().await.unwrap();

        assert_eq!(ctx.settings().count, 9);
        assert_eq!(ctx.settings_writes(), 1);
        assert_eq!(ctx.last_image().as_deref(), Some("data:x"));
        assert_eq!(ctx.feedback().len(), 1);
        assert_eq!(ctx.alerts(), 1);
    }
}
