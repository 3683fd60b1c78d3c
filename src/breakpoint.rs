//! Breakpoint declarations and their translation into media-feature rules.

use indexmap::IndexMap;

use crate::unit::SizeValue;

/// Media features and their values, in declaration order.
pub type Rules = IndexMap<String, SizeValue>;

/// What a single breakpoint matches on.
#[derive(Debug, Clone, PartialEq)]
pub enum Breakpoint {
    /// A minimum width: a number of pixels or a string such as `48em`.
    Size(SizeValue),
    /// A `[min, max]` width pair. Either side may be missing.
    Range(Option<SizeValue>, Option<SizeValue>),
    /// Arbitrary media features such as `orientation` or `minResolution`.
    Features(Rules),
    /// A declaration shape that carries no rules at all.
    Empty,
}

impl Breakpoint {
    pub fn range(min: impl Into<SizeValue>, max: impl Into<SizeValue>) -> Self {
        Breakpoint::Range(Some(min.into()), Some(max.into()))
    }

    pub fn min(min: impl Into<SizeValue>) -> Self {
        Breakpoint::Range(Some(min.into()), None)
    }

    pub fn max(max: impl Into<SizeValue>) -> Self {
        Breakpoint::Range(None, Some(max.into()))
    }

    pub fn features<K, V>(features: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<SizeValue>,
    {
        Breakpoint::Features(
            features
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Attach the state used when there is no media environment to ask.
    pub fn with_default(self, default_value: bool) -> BreakpointEntry {
        BreakpointEntry {
            breakpoint: self,
            default_value: Some(default_value),
        }
    }
}

impl From<f64> for Breakpoint {
    fn from(value: f64) -> Self {
        Breakpoint::Size(value.into())
    }
}

impl From<i32> for Breakpoint {
    fn from(value: i32) -> Self {
        Breakpoint::Size(value.into())
    }
}

impl From<u32> for Breakpoint {
    fn from(value: u32) -> Self {
        Breakpoint::Size(value.into())
    }
}

impl From<&str> for Breakpoint {
    fn from(value: &str) -> Self {
        Breakpoint::Size(value.into())
    }
}

impl From<String> for Breakpoint {
    fn from(value: String) -> Self {
        Breakpoint::Size(value.into())
    }
}

impl From<SizeValue> for Breakpoint {
    fn from(value: SizeValue) -> Self {
        Breakpoint::Size(value)
    }
}

impl<T: Into<SizeValue>> From<[T; 2]> for Breakpoint {
    fn from([min, max]: [T; 2]) -> Self {
        Breakpoint::range(min, max)
    }
}

/// Turn a declaration into the media features it stands for.
///
/// Only well-formed widths become `minWidth`/`maxWidth` rules: a string
/// size without a unit, or a malformed side of a range, is dropped rather
/// than reported.
pub fn compile_rules(breakpoint: &Breakpoint) -> Rules {
    let mut rules = Rules::new();
    match breakpoint {
        Breakpoint::Size(size) => {
            if size.is_width() {
                rules.insert("minWidth".to_string(), size.clone());
            }
        }
        Breakpoint::Range(min, max) => {
            if let Some(min) = min.as_ref().filter(|min| min.is_width()) {
                rules.insert("minWidth".to_string(), min.clone());
            }
            if let Some(max) = max.as_ref().filter(|max| max.is_width()) {
                rules.insert("maxWidth".to_string(), max.clone());
            }
        }
        Breakpoint::Features(features) => {
            rules.extend(features.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Breakpoint::Empty => {}
    }
    rules
}

/// A breakpoint plus its fallback state.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointEntry {
    pub breakpoint: Breakpoint,
    /// Used instead of a live query when no media environment exists,
    /// typically while rendering on a server.
    pub default_value: Option<bool>,
}

impl From<Breakpoint> for BreakpointEntry {
    fn from(breakpoint: Breakpoint) -> Self {
        BreakpointEntry {
            breakpoint,
            default_value: None,
        }
    }
}

macro_rules! entry_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for BreakpointEntry {
                fn from(value: $ty) -> Self {
                    Breakpoint::from(value).into()
                }
            }
        )*
    };
}

entry_from!(f64, i32, u32, &str, String, SizeValue);

impl<T: Into<SizeValue>> From<[T; 2]> for BreakpointEntry {
    fn from(pair: [T; 2]) -> Self {
        Breakpoint::from(pair).into()
    }
}

/// Named breakpoints, in the order they were declared.
///
/// ```rust
/// use floem_match_media::{Breakpoint, Breakpoints};
///
/// let breakpoints = Breakpoints::new()
///     .breakpoint("mobile", Breakpoint::max(767))
///     .breakpoint("tablet", [768, 1023])
///     .breakpoint("desktop", 1024)
///     .breakpoint(
///         "landscape",
///         Breakpoint::features([("orientation", "landscape")]).with_default(false),
///     );
/// assert_eq!(breakpoints.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakpoints {
    entries: IndexMap<String, BreakpointEntry>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a breakpoint, replacing an earlier one with the same name.
    pub fn breakpoint(mut self, name: impl Into<String>, entry: impl Into<BreakpointEntry>) -> Self {
        self.insert(name, entry);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<BreakpointEntry>) {
        self.entries.insert(name.into(), entry.into());
    }

    pub fn get(&self, name: &str) -> Option<&BreakpointEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BreakpointEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Breakpoints
where
    K: Into<String>,
    V: Into<BreakpointEntry>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Breakpoints {
            entries: iter
                .into_iter()
                .map(|(name, entry)| (name.into(), entry.into()))
                .collect(),
        }
    }
}
