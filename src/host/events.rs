//! Inbound host events
//!
//! Only the events the TX gain action reacts to are modelled. Everything
//! else the host sends decodes to [`HostEvent::Other`] and is dropped.
//!
//! Wire shape (one JSON object per message):
//! ```text
//! {"event":"keyDown","action":"com.aurawave.pbox.txgain","context":"A1B2",
//!  "device":"D1","payload":{"settings":{"count":3},"controller":"Keypad"}}
//! ```

use serde::Deserialize;

use super::Controller;
use crate::settings::ControlSettings;

/// Common envelope around every action-scoped event
#[derive(Debug, Clone, Deserialize)]
pub struct ActionEvent<P> {
    pub action: String,
    pub context: String,
    #[serde(default)]
    pub device: String,
    pub payload: P,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPayload {
    #[serde(default)]
    pub settings: ControlSettings,
    #[serde(default)]
    pub controller: Controller,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitlePayload {
    #[serde(default)]
    pub settings: ControlSettings,
    #[serde(default)]
    pub controller: Controller,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RotatePayload {
    #[serde(default)]
    pub settings: ControlSettings,
    #[serde(default)]
    pub ticks: i32,
    #[serde(default)]
    pub pressed: bool,
}

/// Event delivered by the host runtime
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostEvent {
    WillAppear(ActionEvent<SettingsPayload>),
    DidReceiveSettings(ActionEvent<SettingsPayload>),
    TitleParametersDidChange(ActionEvent<TitlePayload>),
    KeyDown(ActionEvent<SettingsPayload>),
    KeyUp(ActionEvent<SettingsPayload>),
    DialDown(ActionEvent<SettingsPayload>),
    DialUp(ActionEvent<SettingsPayload>),
    DialRotate(ActionEvent<RotatePayload>),
    #[serde(other)]
    Other,
}

impl HostEvent {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Control identity the event targets, if it is action-scoped
    pub fn context(&self) -> Option<&str> {
        match self {
            HostEvent::WillAppear(e)
            | HostEvent::DidReceiveSettings(e)
            | HostEvent::KeyDown(e)
            | HostEvent::KeyUp(e)
            | HostEvent::DialDown(e)
            | HostEvent::DialUp(e) => Some(&e.context),
            HostEvent::TitleParametersDidChange(e) => Some(&e.context),
            HostEvent::DialRotate(e) => Some(&e.context),
            HostEvent::Other => None,
        }
    }

    /// Settings delivered with the event
    pub fn settings(&self) -> Option<&ControlSettings> {
        match self {
            HostEvent::WillAppear(e)
            | HostEvent::DidReceiveSettings(e)
            | HostEvent::KeyDown(e)
            | HostEvent::KeyUp(e)
            | HostEvent::DialDown(e)
            | HostEvent::DialUp(e) => Some(&e.payload.settings),
            HostEvent::TitleParametersDidChange(e) => Some(&e.payload.settings),
            HostEvent::DialRotate(e) => Some(&e.payload.settings),
            HostEvent::Other => None,
        }
    }

    /// Control type the event came from. Input events imply it; lifecycle
    /// events report it in the payload.
    pub fn controller(&self) -> Controller {
        match self {
            HostEvent::WillAppear(e) | HostEvent::DidReceiveSettings(e) => e.payload.controller,
            HostEvent::TitleParametersDidChange(e) => e.payload.controller,
            HostEvent::DialDown(_) | HostEvent::DialUp(_) | HostEvent::DialRotate(_) => {
                Controller::Encoder
            }
            HostEvent::KeyDown(_) | HostEvent::KeyUp(_) | HostEvent::Other => Controller::Keypad,
        }
    }

    /// Event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::WillAppear(_) => "willAppear",
            HostEvent::DidReceiveSettings(_) => "didReceiveSettings",
            HostEvent::TitleParametersDidChange(_) => "titleParametersDidChange",
            HostEvent::KeyDown(_) => "keyDown",
            HostEvent::KeyUp(_) => "keyUp",
            HostEvent::DialDown(_) => "dialDown",
            HostEvent::DialUp(_) => "dialUp",
            HostEvent::DialRotate(_) => "dialRotate",
            HostEvent::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_key_down_with_settings() {
        let raw = r#"{"event":"keyDown","action":"com.aurawave.pbox.txgain","context":"ctx-1",
            "device":"dev","payload":{"settings":{"count":5,"incrementBy":2},
            "coordinates":{"column":1,"row":0},"isInMultiAction":false}}"#;

        match HostEvent::from_json(raw).unwrap() {
            HostEvent::KeyDown(e) => {
                assert_eq!(e.context, "ctx-1");
                assert_eq!(e.payload.settings.count, 5);
                assert_eq!(e.payload.settings.increment_by, 2);
                assert_eq!(e.payload.controller, Controller::Keypad);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn decodes_dial_rotate_ticks() {
        let raw = r#"{"event":"dialRotate","action":"a","context":"dial-1",
            "payload":{"settings":{"count":38,"incrementBy":5},"controller":"Encoder","ticks":3,"pressed":false}}"#;

        match HostEvent::from_json(raw).unwrap() {
            HostEvent::DialRotate(e) => {
                assert_eq!(e.payload.ticks, 3);
                assert_eq!(e.payload.settings.count, 38);
                assert!(!e.payload.pressed);
                assert_eq!(e.context, "dial-1");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn decodes_title_change() {
        let raw = r#"{"event":"titleParametersDidChange","action":"a","context":"c",
            "payload":{"settings":{},"controller":"Encoder","title":"Mic 1\n5dB","titleParameters":{}}}"#;

        let event = HostEvent::from_json(raw).unwrap();
        assert_eq!(event.name(), "titleParametersDidChange");
        assert_eq!(event.controller(), Controller::Encoder);
        match event {
            HostEvent::TitleParametersDidChange(e) => {
                assert_eq!(e.payload.title, "Mic 1\n5dB");
                assert_eq!(e.payload.controller, Controller::Encoder);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn unknown_events_decode_to_other() {
        let event = HostEvent::from_json(r#"{"event":"deviceDidConnect","device":"x"}"#).unwrap();
        assert!(matches!(event, HostEvent::Other));
        assert_eq!(event.context(), None);
        assert!(event.settings().is_none());
    }

    #[test]
    fn input_events_imply_controller() {
        let dial = HostEvent::from_json(
            r#"{"event":"dialUp","action":"a","context":"d","payload":{"settings":{"count":4}}}"#,
        )
        .unwrap();
        assert_eq!(dial.controller(), Controller::Encoder);
        assert_eq!(dial.settings().map(|s| s.count), Some(4));

        let key = HostEvent::from_json(
            r#"{"event":"keyUp","action":"a","context":"k","payload":{"settings":{}}}"#,
        )
        .unwrap();
        assert_eq!(key.controller(), Controller::Keypad);
    }

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let event =
            HostEvent::from_json(r#"{"event":"willAppear","action":"a","context":"c","payload":{}}"#)
                .unwrap();
        match event {
            HostEvent::WillAppear(e) => assert_eq!(e.payload.settings, ControlSettings::default()),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
