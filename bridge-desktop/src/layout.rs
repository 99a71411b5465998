//! In-process layout direction flag for desktop shells

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    layout::{LayoutDirection, LayoutDirectionController},
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Desktop windows are rebuilt on demand, so the new direction applies
/// without a restart unless the shell says otherwise.
#[derive(Debug, Default)]
pub struct DesktopLayoutController {
    rtl: AtomicBool,
    restart_required: bool,
}

impl DesktopLayoutController {
    pub fn new() -> Self {
        Self::default()
    }

    /// For shells that only read the direction at startup
    pub fn requiring_restart() -> Self {
        Self {
            rtl: AtomicBool::new(false),
            restart_required: true,
        }
    }
}

#[async_trait]
impl LayoutDirectionController for DesktopLayoutController {
    fn current(&self) -> LayoutDirection {
        LayoutDirection::from_rtl(self.rtl.load(Ordering::SeqCst))
    }

    async fn force_direction(&self, direction: LayoutDirection) -> Result<bool> {
        let previous = self.rtl.swap(direction.is_rtl(), Ordering::SeqCst);
        let changed = previous != direction.is_rtl();
        info!(rtl = direction.is_rtl(), changed, "Layout direction forced");
        Ok(changed && self.restart_required)
    }
}
