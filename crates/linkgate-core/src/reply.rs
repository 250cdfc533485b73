//! Reply cards and inline keyboard descriptors
//!
//! Plain data: the transport decides how to render them.

use std::fmt;
use std::str::FromStr;

/// Action carried in a callback button's data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// "I subscribed" button: re-run the subscription check
    CheckSubscription,
    /// "Shorten a link" button on the welcome card
    Shorten,
}

impl CallbackAction {
    /// Callback data sent by the button
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckSubscription => "check_sub",
            Self::Shorten => "shorten",
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallbackAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check_sub" => Ok(Self::CheckSubscription),
            "shorten" => Ok(Self::Shorten),
            other => Err(format!("unknown callback action: {other}")),
        }
    }
}

/// A single inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    /// Opens an external link
    Url {
        /// Button label
        label: String,
        /// Target URL
        url: String,
    },
    /// Sends a callback query back to the bot
    Callback {
        /// Button label
        label: String,
        /// Action sent as callback data
        action: CallbackAction,
    },
}

impl Button {
    /// URL button
    #[must_use]
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Url {
            label: label.into(),
            url: url.into(),
        }
    }

    /// Callback button
    #[must_use]
    pub fn callback(label: impl Into<String>, action: CallbackAction) -> Self {
        Self::Callback {
            label: label.into(),
            action,
        }
    }
}

/// Rows of inline buttons attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    /// Button rows, top to bottom
    pub rows: Vec<Vec<Button>>,
}

impl InlineKeyboard {
    /// Keyboard from rows of buttons
    #[must_use]
    pub const fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// Whether any button in the keyboard triggers `action`
    #[must_use]
    pub fn has_action(&self, action: CallbackAction) -> bool {
        self.rows.iter().flatten().any(|button| {
            matches!(button, Button::Callback { action: a, .. } if *a == action)
        })
    }
}

/// Photo message with caption and inline keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyCard {
    /// Image reference (URL)
    pub image: String,
    /// Caption under the image
    pub caption: String,
    /// Buttons under the caption
    pub keyboard: InlineKeyboard,
}
