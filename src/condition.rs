use std::{fmt, ops::Deref};

use indexmap::IndexMap;

use crate::{
    breakpoint::{Breakpoint, Breakpoints, compile_rules},
    error::{Error, InvalidUnitError},
};

/// A compiled media-query condition such as
/// `(min-width: 320px) and (max-width: 768px)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Condition(pub(crate) String);

impl Condition {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Condition {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Condition {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `minWidth` -> `min-width`.
///
/// A hyphen goes in front of every uppercase letter that follows a word
/// character. Pairs are taken left to right without overlapping, so in
/// `aBC` only the `B` gets one.
pub fn to_kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match chars.get(i + 1) {
            Some(&next) if is_word_char(c) && next.is_ascii_uppercase() => {
                out.push(c);
                out.push('-');
                out.push(next);
                i += 2;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out.to_lowercase()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Compile a declaration into its media-query condition.
///
/// A declaration with no rules compiles to the empty condition.
pub fn compile_condition(breakpoint: &Breakpoint) -> Result<Condition, InvalidUnitError> {
    let rules = compile_rules(breakpoint);
    let mut clauses = Vec::with_capacity(rules.len());
    for (feature, value) in &rules {
        clauses.push(format!("({}: {})", to_kebab_case(feature), value.render()?));
    }
    Ok(Condition(clauses.join(" and ")))
}

/// Every breakpoint name with its compiled condition. Built once, never
/// changed afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakpointRegistry {
    conditions: IndexMap<String, Condition>,
}

impl BreakpointRegistry {
    /// Compile all declarations, stopping at the first invalid value.
    pub fn compile(breakpoints: &Breakpoints) -> Result<Self, Error> {
        let mut conditions = IndexMap::with_capacity(breakpoints.len());
        for (name, entry) in breakpoints.iter() {
            let condition =
                compile_condition(&entry.breakpoint).map_err(|source| Error::InvalidUnit {
                    breakpoint: name.to_string(),
                    source,
                })?;
            if condition.is_empty() {
                tracing::warn!(
                    breakpoint = name,
                    "breakpoint declaration produced no media features"
                );
            } else {
                tracing::trace!(breakpoint = name, %condition, "compiled breakpoint");
            }
            conditions.insert(name.to_string(), condition);
        }
        Ok(Self { conditions })
    }

    pub fn get(&self, name: &str) -> Option<&Condition> {
        self.conditions.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions
            .iter()
            .map(|(name, condition)| (name.as_str(), condition))
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
