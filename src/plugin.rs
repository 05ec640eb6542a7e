//! Event routing from the host to the key and dial handlers

use std::sync::Arc;
use tracing::debug;

use crate::actions::{DialAction, KeyAction, VolumeDispatcher};
use crate::config::PluginConfig;
use crate::device::VolumeSink;
use crate::host::{Controller, HostEvent, SharedContext};

/// Action UUID the host registers this plugin's TX gain action under
pub const TXGAIN_ACTION: &str = "com.aurawave.pbox.txgain";

pub struct Plugin {
    key: KeyAction,
    dial: DialAction,
}

impl Plugin {
    pub fn new(config: &PluginConfig, sink: Arc<dyn VolumeSink>) -> Self {
        let dispatcher = Arc::new(VolumeDispatcher::new(sink));
        Self {
            key: KeyAction::new(Arc::clone(&dispatcher), config.long_press()),
            dial: DialAction::new(dispatcher, config.long_press()),
        }
    }

    pub fn key(&self) -> &KeyAction {
        &self.key
    }

    pub fn dial(&self) -> &DialAction {
        &self.dial
    }

    /// Dispatch one host event for the control behind `ctx`
    pub async fn handle(&self, event: HostEvent, ctx: SharedContext) {
        debug!("{}: {}", ctx.id(), event.name());
        let is_dial = ctx.controller() == Controller::Encoder;

        match event {
            HostEvent::WillAppear(e) => {
                let settings = &e.payload.settings;
                if is_dial {
                    self.dial.on_will_appear(ctx.as_ref(), settings).await;
                } else {
                    self.key.on_will_appear(ctx.as_ref(), settings).await;
                }
            }
            HostEvent::DidReceiveSettings(e) => {
                let settings = &e.payload.settings;
                if is_dial {
                    self.dial.on_did_receive_settings(ctx.as_ref(), settings).await;
                } else {
                    self.key.on_did_receive_settings(ctx.as_ref(), settings).await;
                }
            }
            HostEvent::TitleParametersDidChange(e) => {
                let p = &e.payload;
                if is_dial {
                    self.dial.on_title_changed(ctx.as_ref(), &p.title, &p.settings).await;
                } else {
                    self.key.on_title_changed(ctx.as_ref(), &p.title, &p.settings).await;
                }
            }
            HostEvent::KeyDown(e) => self.key.on_key_down(ctx, e.payload.settings),
            HostEvent::KeyUp(e) => {
                self.key.on_key_up(ctx.as_ref(), &e.payload.settings).await;
            }
            HostEvent::DialDown(e) => self.dial.on_dial_down(ctx, e.payload.settings),
            HostEvent::DialUp(_) => self.dial.on_dial_up(ctx.as_ref()).await,
            HostEvent::DialRotate(e) => {
                self.dial
                    .on_dial_rotate(ctx.as_ref(), &e.payload.settings, e.payload.ticks)
                    .await;
            }
            HostEvent::Other => {}
        }
    }
}
