//! Layout Direction Abstraction
//!
//! Arabic renders right-to-left. Mobile hosts can only switch the global
//! layout direction for the next launch, so the core asks the host to force
//! a direction and reports back whether a restart is needed.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Text layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    Ltr,
    Rtl,
}

impl LayoutDirection {
    pub fn from_rtl(rtl: bool) -> Self {
        if rtl {
            LayoutDirection::Rtl
        } else {
            LayoutDirection::Ltr
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, LayoutDirection::Rtl)
    }
}

/// Platform RTL toggle
///
/// - **iOS/Android**: `I18nManager.forceRTL`-style global switch, applied on
///   the next launch
/// - **Desktop**: an in-process flag the shell reads when building windows
#[async_trait::async_trait]
pub trait LayoutDirectionController: Send + Sync {
    /// Direction the UI is currently laid out in
    fn current(&self) -> LayoutDirection;

    /// Request a new direction.
    ///
    /// Returns `true` when the change only takes effect after an app restart.
    async fn force_direction(&self, direction: LayoutDirection) -> Result<bool>;
}
