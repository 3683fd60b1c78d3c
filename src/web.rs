//! `window.matchMedia` on the web.

use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{MediaQueryList, MediaQueryListEvent, Window};

use crate::{
    condition::Condition,
    error::Error,
    watcher::{MediaEnvironment, MediaQueryWatcher},
};

/// The browser window as a media environment.
#[derive(Debug, Clone)]
pub struct WebMedia {
    window: Window,
}

impl WebMedia {
    /// The current window, or `None` outside a browser (workers, SSR).
    pub fn detect() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl MediaEnvironment for WebMedia {
    fn watch(&self, condition: &Condition) -> Result<Box<dyn MediaQueryWatcher>, Error> {
        let failed = |message: String| Error::MatchMedia {
            condition: condition.to_string(),
            message,
        };
        let list = self
            .window
            .match_media(condition)
            .map_err(|err| failed(format!("{err:?}")))?
            .ok_or_else(|| failed("matchMedia returned null".to_string()))?;
        Ok(Box::new(WebWatcher {
            list,
            listeners: Vec::new(),
        }))
    }
}

struct WebWatcher {
    list: MediaQueryList,
    listeners: Vec<Closure<dyn FnMut(MediaQueryListEvent)>>,
}

impl MediaQueryWatcher for WebWatcher {
    fn currently_matches(&self) -> bool {
        self.list.matches()
    }

    // `addListener` is deprecated, but `addEventListener` on a
    // MediaQueryList only arrived in Safari 14.
    #[allow(deprecated)]
    fn on_change(&mut self, callback: Box<dyn Fn(bool)>) -> Result<(), Error> {
        let listener = Closure::<dyn FnMut(MediaQueryListEvent)>::new(
            move |event: MediaQueryListEvent| callback(event.matches()),
        );
        self.list
            .add_listener_with_opt_callback(Some(listener.as_ref().unchecked_ref()))
            .map_err(|err| Error::MatchMedia {
                condition: self.list.media(),
                message: format!("addListener failed: {err:?}"),
            })?;
        self.listeners.push(listener);
        Ok(())
    }

    #[allow(deprecated)]
    fn release(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(err) = self
                .list
                .remove_listener_with_opt_callback(Some(listener.as_ref().unchecked_ref()))
            {
                tracing::debug!(
                    media = %self.list.media(),
                    ?err,
                    "failed to remove media query listener"
                );
            }
        }
    }
}
