//! Dial (encoder) handler
//!
//! Rotation applies `incrementBy * ticks` immediately, clamped to the device
//! range. The dial's own press is only used for reset on long press.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{arm_reset, VolumeDispatcher};
use crate::host::{ActionContext, SharedContext};
use crate::press::{LongPressTimers, Released};
use crate::settings::ControlSettings;

pub struct DialAction {
    dispatcher: Arc<VolumeDispatcher>,
    timers: LongPressTimers,
}

impl DialAction {
    pub fn new(dispatcher: Arc<VolumeDispatcher>, long_press: Duration) -> Self {
        Self {
            dispatcher,
            timers: LongPressTimers::new(long_press),
        }
    }

    pub fn timers(&self) -> &LongPressTimers {
        &self.timers
    }

    pub async fn on_will_appear(&self, ctx: &dyn ActionContext, settings: &ControlSettings) {
        self.dispatcher.refresh(ctx, settings.count).await;
    }

    pub async fn on_did_receive_settings(
        &self,
        ctx: &dyn ActionContext,
        settings: &ControlSettings,
    ) {
        self.dispatcher.refresh(ctx, settings.count).await;
    }

    pub async fn on_title_changed(
        &self,
        ctx: &dyn ActionContext,
        title: &str,
        settings: &ControlSettings,
    ) {
        self.dispatcher.titles().update(ctx.id(), title);
        self.dispatcher.refresh(ctx, settings.count).await;
    }

    pub fn on_dial_down(&self, ctx: SharedContext, settings: ControlSettings) {
        arm_reset(&self.timers, &self.dispatcher, ctx, settings);
    }

    pub async fn on_dial_up(&self, ctx: &dyn ActionContext) {
        if self.timers.release(ctx.id()).await == Released::Short {
            debug!("{}: dial press released before long press", ctx.id());
        }
    }

    /// Returns the level that was requested
    pub async fn on_dial_rotate(
        &self,
        ctx: &dyn ActionContext,
        settings: &ControlSettings,
        ticks: i32,
    ) -> i32 {
        let level = settings.rotated_level(ticks);
        debug!("{}: rotate {} ticks -> {}dB", ctx.id(), ticks, level);
        self.dispatcher.apply(ctx, settings, level).await;
        level
    }
}
