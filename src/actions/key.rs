//! Key (button) handler
//!
//! Short press steps the level by `incrementBy`; holding for the long-press
//! threshold resets it to 0 dB instead.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{arm_reset, VolumeDispatcher};
use crate::host::{ActionContext, SharedContext};
use crate::press::{LongPressTimers, Released};
use crate::settings::ControlSettings;

pub struct KeyAction {
    dispatcher: Arc<VolumeDispatcher>,
    timers: LongPressTimers,
}

impl KeyAction {
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
        let label = self.dispatcher.titles().update(ctx.id(), title);
        debug!("{}: label {:?}", ctx.id(), label);
        self.dispatcher.refresh(ctx, settings.count).await;
    }

    pub fn on_key_down(&self, ctx: SharedContext, settings: ControlSettings) {
        arm_reset(&self.timers, &self.dispatcher, ctx, settings);
    }

    /// Returns whether the release was a short press that dispatched a level
    pub async fn on_key_up(&self, ctx: &dyn ActionContext, settings: &ControlSettings) -> bool {
        match self.timers.release(ctx.id()).await {
            Released::Short => {}
            Released::Long => return false,
            Released::Idle => {
                debug!("{}: release after long press, ignored", ctx.id());
                return false;
            }
        }
        let level = settings.stepped_level();
        self.dispatcher.apply(ctx, settings, level).await;
        true
    }
}
