//! Workspace umbrella crate.
//!
//! Exposes feature flags that map to the individual workspace crates
//! (`core-service`, `core-playback`, `bridge-traits`). Host applications can
//! depend on `media-core-workspace` and enable `desktop-shims` (software
//! engine included) or `headless` (engine injected by the host) without
//! wiring each crate individually.

#[cfg(any(feature = "desktop-shims", feature = "headless"))]
pub use bridge_traits as bridge;
#[cfg(any(feature = "desktop-shims", feature = "headless"))]
pub use core_playback as playback;
#[cfg(any(feature = "desktop-shims", feature = "headless"))]
pub use core_service::{CoreError, PlayerService, Result};

#[cfg(feature = "desktop-shims")]
pub use core_service::bootstrap_desktop;
