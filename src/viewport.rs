//! A media environment driven by the host's window size.
//!
//! Native windows have no `matchMedia`, so the host reports its size and the
//! viewport evaluates compiled conditions itself. Only the features a
//! breakpoint usually needs are understood: `width`, `height`,
//! `aspect-ratio` (each with `min-`/`max-` forms) and `orientation`.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use cssparser::{ParseError, Parser, ParserInput, Token};
use indexmap::IndexMap;
use peniko::kurbo::Size;
use smallvec::SmallVec;

use crate::{
    condition::Condition,
    error::Error,
    watcher::{MediaEnvironment, MediaQueryWatcher},
};

/// Pixels per `em`/`rem` when evaluating lengths.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cmp {
    Min,
    Max,
    Exact,
}

impl Cmp {
    fn test(self, actual: f64, expected: f64) -> bool {
        match self {
            Cmp::Min => actual >= expected,
            Cmp::Max => actual <= expected,
            Cmp::Exact => actual == expected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Clause {
    Width(Cmp, f64),
    Height(Cmp, f64),
    AspectRatio(Cmp, f64),
    Portrait(bool),
}

impl Clause {
    fn matches(&self, size: Size) -> bool {
        match *self {
            Clause::Width(cmp, width) => cmp.test(size.width, width),
            Clause::Height(cmp, height) => cmp.test(size.height, height),
            Clause::AspectRatio(cmp, ratio) => {
                size.height > 0.0 && cmp.test(size.width / size.height, ratio)
            }
            Clause::Portrait(portrait) => (size.height >= size.width) == portrait,
        }
    }
}

type ParseResult<'i, T> = Result<T, ParseError<'i, ()>>;

/// `(feature: value) and (feature: value) ...`
fn parse_condition<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, SmallVec<[Clause; 2]>> {
    let mut clauses = SmallVec::new();
    if parser.is_exhausted() {
        return Ok(clauses);
    }
    loop {
        parser.expect_parenthesis_block()?;
        clauses.push(parser.parse_nested_block(parse_feature)?);
        if parser.is_exhausted() {
            return Ok(clauses);
        }
        parser.expect_ident_matching("and")?;
    }
}

/// The inside of one `( feature : value )` block.
fn parse_feature<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, Clause> {
    let name = parser.expect_ident()?.to_ascii_lowercase();
    parser.expect_colon()?;

    let (cmp, feature) = if let Some(feature) = name.strip_prefix("min-") {
        (Cmp::Min, feature)
    } else if let Some(feature) = name.strip_prefix("max-") {
        (Cmp::Max, feature)
    } else {
        (Cmp::Exact, name.as_str())
    };

    let clause = match (cmp, feature) {
        (_, "width") => Clause::Width(cmp, parse_length(parser)?),
        (_, "height") => Clause::Height(cmp, parse_length(parser)?),
        (_, "aspect-ratio") => Clause::AspectRatio(cmp, parse_ratio(parser)?),
        (Cmp::Exact, "orientation") => {
            let value = parser.expect_ident()?.to_ascii_lowercase();
            match value.as_str() {
                "portrait" => Clause::Portrait(true),
                "landscape" => Clause::Portrait(false),
                _ => return Err(parser.new_custom_error(())),
            }
        }
        _ => return Err(parser.new_custom_error(())),
    };
    parser.expect_exhausted()?;
    Ok(clause)
}

/// A `<length>` in pixels: px, em and rem (units are case-insensitive), or a
/// bare number taken as pixels.
fn parse_length<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, f64> {
    let token = parser.next()?.clone();
    match token {
        Token::Dimension { value, ref unit, .. } => {
            let scale = match unit.to_ascii_lowercase().as_str() {
                "px" => 1.0,
                "em" | "rem" => DEFAULT_FONT_SIZE,
                _ => return Err(parser.new_unexpected_token_error(token.clone())),
            };
            Ok(value as f64 * scale)
        }
        Token::Number { value, .. } => Ok(value as f64),
        _ => Err(parser.new_unexpected_token_error(token)),
    }
}

/// `<number>` or `<number> / <number>`.
fn parse_ratio<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, f64> {
    let width = parser.expect_number()? as f64;
    let ratio = if parser.try_parse(|parser| parser.expect_delim('/')).is_ok() {
        width / parser.expect_number()? as f64
    } else {
        width
    };
    if ratio.is_finite() {
        Ok(ratio)
    } else {
        Err(parser.new_custom_error(()))
    }
}

/// A parsed condition. `None` when any clause is not understood, in which
/// case the query never matches.
#[derive(Debug, Clone, PartialEq)]
struct Query(Option<SmallVec<[Clause; 2]>>);

impl Query {
    fn parse(condition: &Condition) -> Query {
        let mut input = ParserInput::new(condition);
        let mut parser = Parser::new(&mut input);
        let clauses = parse_condition(&mut parser).ok();
        if clauses.is_none() {
            tracing::debug!(%condition, "unsupported media query never matches the viewport");
        }
        Query(clauses)
    }

    fn matches(&self, size: Size) -> bool {
        self.0
            .as_ref()
            .is_some_and(|clauses| clauses.iter().all(|clause| clause.matches(size)))
    }
}

/// Evaluate a compiled condition against a viewport size.
pub fn evaluate(condition: &Condition, size: Size) -> bool {
    Query::parse(condition).matches(size)
}

struct Listener {
    query: Query,
    matches: bool,
    callbacks: SmallVec<[Rc<dyn Fn(bool)>; 1]>,
}

struct ViewportState {
    size: Size,
    next_id: u64,
    listeners: IndexMap<u64, Listener>,
}

/// A viewport whose size is pushed by the host, usually from the window's
/// resize events.
///
/// Cloning gives another handle to the same viewport.
#[derive(Clone)]
pub struct Viewport {
    state: Rc<RefCell<ViewportState>>,
}

impl Viewport {
    pub fn new(size: impl Into<Size>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewportState {
                size: size.into(),
                next_id: 0,
                listeners: IndexMap::new(),
            })),
        }
    }

    pub fn size(&self) -> Size {
        self.state.borrow().size
    }

    /// Number of watchers that have not been released.
    pub fn watcher_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Update the size and notify every watcher whose match state changed.
    pub fn resize(&self, size: impl Into<Size>) {
        let size = size.into();
        let mut changed = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            if state.size == size {
                return;
            }
            state.size = size;
            for listener in state.listeners.values_mut() {
                let matches = listener.query.matches(size);
                if matches != listener.matches {
                    listener.matches = matches;
                    changed.extend(listener.callbacks.iter().map(|cb| (cb.clone(), matches)));
                }
            }
        }
        tracing::trace!(?size, notified = changed.len(), "viewport resized");
        // Callbacks run after the borrow ends so they may read the viewport.
        for (callback, matches) in changed {
            callback(matches);
        }
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Viewport")
            .field("size", &state.size)
            .field("watchers", &state.listeners.len())
            .finish()
    }
}

impl MediaEnvironment for Viewport {
    fn watch(&self, condition: &Condition) -> Result<Box<dyn MediaQueryWatcher>, Error> {
        let mut state = self.state.borrow_mut();
        let query = Query::parse(condition);
        let matches = query.matches(state.size);
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(
            id,
            Listener {
                query,
                matches,
                callbacks: SmallVec::new(),
            },
        );
        Ok(Box::new(ViewportWatcher {
            id,
            state: Rc::downgrade(&self.state),
        }))
    }
}

struct ViewportWatcher {
    id: u64,
    state: Weak<RefCell<ViewportState>>,
}

impl MediaQueryWatcher for ViewportWatcher {
    fn currently_matches(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let state = state.borrow();
        state
            .listeners
            .get(&self.id)
            .is_some_and(|listener| listener.matches)
    }

    fn on_change(&mut self, callback: Box<dyn Fn(bool)>) -> Result<(), Error> {
        // A dropped viewport or a released watcher never changes again.
        let Some(state) = self.state.upgrade() else {
            return Ok(());
        };
        let mut state = state.borrow_mut();
        if let Some(listener) = state.listeners.get_mut(&self.id) {
            listener.callbacks.push(Rc::from(callback));
        }
        Ok(())
    }

    fn release(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().listeners.shift_remove(&self.id);
        }
    }
}
