//! Volume-update dispatcher shared by the key and dial actions

use std::sync::Arc;
use tracing::{info, warn};

use crate::device::{VolumeError, VolumeSink};
use crate::display::{render_data_uri, TitleCache};
use crate::host::{ActionContext, Controller, DialFeedback};
use crate::settings::ControlSettings;

/// Sends a target level to the configured device and reflects the outcome
/// on the control.
pub struct VolumeDispatcher {
    sink: Arc<dyn VolumeSink>,
    titles: TitleCache,
}

impl VolumeDispatcher {
    pub fn new(sink: Arc<dyn VolumeSink>) -> Self {
        Self {
            sink,
            titles: TitleCache::new(),
        }
    }

    pub fn titles(&self) -> &TitleCache {
        &self.titles
    }

    /// Apply `level` to the device behind `settings`.
    ///
    /// On success the level is persisted through the host and the display is
    /// refreshed. Every failure raises the host alert and leaves settings and
    /// display untouched. Returns whether the level was applied.
    pub async fn apply(
        &self,
        ctx: &dyn ActionContext,
        settings: &ControlSettings,
        level: i32,
    ) -> bool {
        match self.send(settings, level).await {
            Ok(()) => {
                info!("{}: level set to {}dB", ctx.id(), level);
                let updated = ControlSettings {
                    count: level,
                    ..settings.clone()
                };
                if let Err(e) = ctx.set_settings(&updated).await {
                    warn!("{}: failed to persist settings: {}", ctx.id(), e);
                }
                self.refresh(ctx, level).await;
                true
            }
            Err(e) => {
                warn!("{}: {}dB not applied: {}", ctx.id(), level, e);
                if let Err(e) = ctx.show_alert().await {
                    warn!("{}: failed to show alert: {}", ctx.id(), e);
                }
                false
            }
        }
    }

    async fn send(&self, settings: &ControlSettings, level: i32) -> Result<(), VolumeError> {
        if !settings.has_device() {
            return Err(VolumeError::MissingDevice);
        }
        self.sink
            .set_volume(settings.address(), settings.bearer(), level)
            .await
    }

    /// Redraw the control for `level`. Dials also get touch-strip feedback.
    pub async fn refresh(&self, ctx: &dyn ActionContext, level: i32) {
        let image = render_data_uri(&self.titles.label(ctx.id()), level);
        if let Err(e) = ctx.set_image(&image).await {
            warn!("{}: failed to set image: {}", ctx.id(), e);
        }

        if ctx.controller() == Controller::Encoder {
            if let Err(e) = ctx.set_feedback(&DialFeedback::for_level(level)).await {
                warn!("{}: failed to set feedback: {}", ctx.id(), e);
            }
        }
    }
}
