//! Push-notification formatting.
//!
//! The worker turns a raw push payload into a displayable notification by
//! filling in fixed defaults; actually showing it is the host's job.
//! Empty strings count as absent, matching the original truthiness
//! behavior of the payload fields.

use seawall_core::Error;
use serde::{Deserialize, Serialize};

const DEFAULT_TITLE: &str = "Remix PWA";
const DEFAULT_BODY: &str = "Notification Body Text";
const DEFAULT_ICON: &str = "/icons/android-icon-192x192.png";
const DEFAULT_BADGE: &str = "/icons/android-icon-48x48.png";

/// Raw push payload as delivered. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub dir: Option<NotificationDirection>,
    pub image: Option<String>,
    pub silent: Option<bool>,
}

impl PushPayload {
    /// Parse a payload from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPush` for anything that is not a JSON
    /// object of the payload shape.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::InvalidPush(format!("malformed push payload: {e}")))
    }
}

/// Text direction of the rendered notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationDirection {
    #[default]
    Auto,
    Ltr,
    Rtl,
}

/// A notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub options: NotificationOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub dir: NotificationDirection,
    pub image: Option<String>,
    pub silent: bool,
}

impl Notification {
    /// Fill a payload's gaps with the fixed defaults.
    pub fn from_payload(payload: PushPayload) -> Self {
        Self {
            title: or_default(payload.title, DEFAULT_TITLE),
            options: NotificationOptions {
                body: or_default(payload.body, DEFAULT_BODY),
                icon: or_default(payload.icon, DEFAULT_ICON),
                badge: or_default(payload.badge, DEFAULT_BADGE),
                dir: payload.dir.unwrap_or_default(),
                image: payload.image.filter(|image| !image.is_empty()),
                silent: payload.silent.unwrap_or(false),
            },
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}
