//! Route patterns.
//!
//! A pattern is a path template. `:name` captures one path segment (any run
//! of characters except `/`) and a trailing `*` captures the rest of the
//! path. Everything else must match literally, and the whole path must
//! match: `/users/:id` matches `/users/42` but neither `/users` nor
//! `/users/42/posts`.

use regex::Regex;
use rill_core::Params;

use crate::RouteConfigError;

const RESERVED: &[char] = &['(', ')', '[', ']', '{', '}', '?'];

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    names: Vec<String>,
    wildcard: bool,
}

impl RoutePattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteConfigError`] naming the pattern when it is empty, does
    /// not start with `/` (a lone `*` is allowed), has a `:` without a
    /// parameter name, repeats a parameter name, uses `*` anywhere but at the
    /// end, or contains one of `( ) [ ] { } ?`.
    pub fn parse(pattern: &str) -> Result<Self, RouteConfigError> {
        if pattern.is_empty() {
            return Err(RouteConfigError::new(pattern, "pattern is empty"));
        }
        if !pattern.starts_with('/') && pattern != "*" {
            return Err(RouteConfigError::new(pattern, "pattern must start with `/`"));
        }

        let mut source = String::with_capacity(pattern.len() + 8);
        source.push('^');
        let mut names: Vec<String> = Vec::new();
        let mut wildcard = false;
        let mut chars = pattern.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                ':' => {
                    let mut name = String::new();
                    while let Some(&(_, next)) = chars.peek() {
                        if !(next.is_ascii_alphanumeric() || next == '_') {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }
                    if name.is_empty() {
                        return Err(RouteConfigError::new(
                            pattern,
                            format!("`:` at offset {offset} is not followed by a parameter name"),
                        ));
                    }
                    if names.contains(&name) {
                        return Err(RouteConfigError::new(
                            pattern,
                            format!("parameter `{name}` appears more than once"),
                        ));
                    }
                    source.push_str("([^/]+)");
                    names.push(name);
                }
                '*' => {
                    if offset + 1 != pattern.len() {
                        return Err(RouteConfigError::new(
                            pattern,
                            "wildcard `*` must be the final character",
                        ));
                    }
                    source.push_str("(.*)");
                    wildcard = true;
                }
                c if RESERVED.contains(&c) => {
                    return Err(RouteConfigError::new(
                        pattern,
                        format!("reserved character `{c}`"),
                    ));
                }
                c => source.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        source.push('$');

        let regex = Regex::new(&source)
            .map_err(|error| RouteConfigError::new(pattern, error.to_string()))?;

        Ok(Self {
            source: pattern.to_owned(),
            regex,
            names,
            wildcard,
        })
    }

    /// The pattern text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parameter names, in pattern order.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    /// Returns `true` if the pattern ends with `*`.
    #[must_use]
    pub const fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Matches a full path, returning the named parameters on success.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .zip(captures.iter().skip(1))
                .filter_map(|(name, capture)| {
                    capture.map(|capture| (name.clone(), capture.as_str().to_owned()))
                })
                .collect(),
        )
    }
}
