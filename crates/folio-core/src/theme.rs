// Color theme preference.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::watch;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    Light,
    Dark,
    /// Follow the platform preference; treated as dark when toggling.
    #[default]
    System,
}

impl Theme {
    /// The opposite explicit theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark | Self::System => Self::Light,
        }
    }
}

/// Current theme, observable by anything rendering output.
#[derive(Debug)]
pub struct ThemeState {
    theme: watch::Sender<Theme>,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl ThemeState {
    pub fn new(initial: Theme) -> Self {
        let (theme, _) = watch::channel(initial);
        Self { theme }
    }

    pub fn current(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn set(&self, theme: Theme) {
        self.theme.send_if_modified(|current| {
            let changed = *current != theme;
            *current = theme;
            changed
        });
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle(&self) -> Theme {
        let mut next = Theme::default();
        self.theme.send_modify(|current| {
            *current = current.toggled();
            next = *current;
        });
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }
}
