//! # Floem Match Media
//! Media-query breakpoints as reactive flags.
//!
//! Declare named breakpoints, install them, and read whether each one
//! currently matches. Every flag is a signal in Floem's reactive runtime, so
//! views that read a flag update when the viewport crosses a breakpoint.
//!
//! ## Example: Breakpoints
//! ```rust
//! use floem_match_media::{Breakpoint, Breakpoints, MatchMedia, Viewport};
//!
//! let breakpoints = Breakpoints::new()
//!     .breakpoint("mobile", Breakpoint::max(767))
//!     .breakpoint("desktop", 1024)
//!     .breakpoint("landscape", Breakpoint::features([("orientation", "landscape")]));
//!
//! let viewport = Viewport::new((390.0, 844.0));
//! let media = MatchMedia::install(&breakpoints, Some(&viewport)).unwrap();
//! let store = media.store().clone();
//!
//! assert_eq!(
//!     media.conditions().get("mobile").unwrap().as_str(),
//!     "(max-width: 767px)"
//! );
//! assert_eq!(store.get("mobile"), Some(true));
//!
//! viewport.resize((1280.0, 800.0));
//! assert_eq!(store.get("mobile"), Some(false));
//! assert_eq!(store.get("landscape"), Some(true));
//! ```
//!
//! ## Declarations
//!
//! A breakpoint is one of:
//! - a number of pixels or a length such as `"48em"`: a minimum width,
//! - a `[min, max]` pair of widths, either side optional,
//! - a map of arbitrary media features (`minHeight`, `orientation`, ...),
//!   written in camel case and rendered in kebab case.
//!
//! Numbers always render with a `px` suffix. A declaration can carry a
//! default value with [`Breakpoint::with_default`], which is what the flag
//! holds when there is no media environment to ask, such as during
//! server-side rendering. [`Breakpoints::from_json`] reads the same
//! shapes from configuration.
//!
//! ## Environments
//!
//! Match states come from a [`MediaEnvironment`]. On the web that is the
//! browser's `matchMedia` (`WebMedia`, wasm32 only). Native windows use a
//! [`Viewport`] whose size the host keeps up to date. Passing no environment
//! installs every breakpoint at its default value.

pub mod breakpoint;
pub mod condition;
pub mod config;
pub mod error;
pub mod match_media;
pub mod responsive;
pub mod store;
pub mod unit;
pub mod viewport;
pub mod watcher;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use breakpoint::{Breakpoint, BreakpointEntry, Breakpoints, Rules, compile_rules};
pub use condition::{BreakpointRegistry, Condition, compile_condition, to_kebab_case};
pub use error::{Error, InvalidUnitError};
pub use match_media::{MatchMedia, use_match_media};
pub use responsive::GridBreakpoints;
pub use store::MatchMediaStore;
pub use unit::{SizeValue, render_value};
pub use viewport::Viewport;
pub use watcher::{MediaEnvironment, MediaQueryWatcher, Subscriptions};
#[cfg(target_arch = "wasm32")]
pub use web::WebMedia;

pub use floem_reactive as reactive;
pub use peniko::kurbo;
