//! TX gain actions
//!
//! Two independent handlers, one per control type. Both send levels through
//! a shared [`VolumeDispatcher`] and reset to 0 dB on a long press.

pub mod dial;
pub mod dispatch;
pub mod key;

use std::sync::Arc;
use tracing::{info, warn};

use crate::host::SharedContext;
use crate::press::LongPressTimers;
use crate::settings::ControlSettings;

pub use dial::DialAction;
pub use dispatch::VolumeDispatcher;
pub use key::KeyAction;

/// Level a long press resets to
pub const RESET_LEVEL: i32 = 0;

/// Arm the long-press timer for `ctx`; on expiry the level is reset.
///
/// The host is asked for the latest settings when the timer fires, falling
/// back to the ones delivered with the press.
fn arm_reset(
    timers: &LongPressTimers,
    dispatcher: &Arc<VolumeDispatcher>,
    ctx: SharedContext,
    pressed_with: ControlSettings,
) {
    let dispatcher = Arc::clone(dispatcher);
    let id = ctx.id().to_string();
    timers.press(&id, move || async move {
        let settings = match ctx.get_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{}: could not re-read settings ({}), using press payload", ctx.id(), e);
                pressed_with
            }
        };
        info!("{}: long press, resetting to {}dB", ctx.id(), RESET_LEVEL);
        dispatcher.apply(ctx.as_ref(), &settings, RESET_LEVEL).await;
    });
}
