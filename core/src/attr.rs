//! Attribute values carried by declarative elements.
//!
//! Attributes are an explicit tagged variant rather than "anything": the
//! renderer decides how to apply each one by matching on [`AttrValue`], so a
//! style map, an event handler and a plain string can never be confused.

use std::{borrow::Cow, collections::BTreeMap, fmt::Write as _};

use crate::{Event, EventHandler};

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// An absent value; the renderer skips the attribute entirely.
    Null,
    /// A string.
    Text(String),
    /// A number.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// Inline style sub-properties.
    Style(StyleMap),
    /// A callable bound through an `on*` attribute.
    Handler(EventHandler),
}

impl AttrValue {
    /// Truthiness used by boolean attributes such as `checked`.
    ///
    /// Empty strings, zero, `NaN`, `false` and `Null` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(text) => !text.is_empty(),
            Self::Number(number) => *number != 0.0 && !number.is_nan(),
            Self::Bool(flag) => *flag,
            Self::Style(_) | Self::Handler(_) => true,
        }
    }

    /// String form of the value, or `None` for values without one.
    #[must_use]
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::Null | Self::Handler(_) => None,
            Self::Text(text) => Some(text.clone()),
            Self::Number(number) => Some(format_number(*number)),
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Style(style) => Some(style.css_text()),
        }
    }

    /// Returns the handler, if this value is one.
    #[must_use]
    pub const fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            Self::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    /// Returns `true` for [`AttrValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Formats a number the way it reads in markup: integral values print
/// without a fractional part.
#[must_use]
pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        return "NaN".to_owned();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if number.fract() == 0.0 && number.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let integral = number as i64;
        return integral.to_string();
    }
    number.to_string()
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    Self::Number(f64::from(value))
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, u8, u16, u32, f32, f64);

impl From<i64> for AttrValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<usize> for AttrValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<StyleMap> for AttrValue {
    fn from(value: StyleMap) -> Self {
        Self::Style(value)
    }
}

impl From<EventHandler> for AttrValue {
    fn from(value: EventHandler) -> Self {
        Self::Handler(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Inline style declarations, keyed by property name.
///
/// Property names may be given in camelCase (`backgroundColor`) or CSS form
/// (`background-color`); both address the same property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap(BTreeMap<String, Option<String>>);

impl StyleMap {
    /// Creates an empty style map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets a property.
    #[must_use]
    pub fn set(mut self, property: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(property, Some(value.into()));
        self
    }

    /// Sets or clears a property. Cleared properties are skipped when rendering.
    pub fn insert(&mut self, property: impl AsRef<str>, value: Option<String>) {
        self.0
            .insert(css_property_name(property.as_ref()).into_owned(), value);
    }

    /// Looks up a property value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .get(css_property_name(property).as_ref())
            .and_then(Option::as_deref)
    }

    /// Iterates over `(property, value)` pairs, including cleared ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes the set properties as CSS declaration text.
    #[must_use]
    pub fn css_text(&self) -> String {
        let mut text = String::new();
        for (name, value) in self.iter() {
            let Some(value) = value else { continue };
            if !text.is_empty() {
                text.push(' ');
            }
            let _ = write!(text, "{name}: {value};");
        }
        text
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Self::new();
        for (name, value) in iter {
            style.insert(name, Some(value.into()));
        }
        style
    }
}

/// Normalizes a camelCase style property name to its CSS form.
///
/// Names that already contain a dash, including custom properties, are
/// returned unchanged.
#[must_use]
pub fn css_property_name(name: &str) -> Cow<'_, str> {
    if name.contains('-') || !name.chars().any(|c| c.is_ascii_uppercase()) {
        return Cow::Borrowed(name);
    }
    let mut css = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            css.push('-');
            css.push(c.to_ascii_lowercase());
        } else {
            css.push(c);
        }
    }
    Cow::Owned(css)
}

/// Ordered attribute list of a declarative element.
///
/// Setting a name that is already present replaces its value in place, so
/// the original position is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

/// Shorthand for [`Attributes::new`].
#[must_use]
pub const fn attrs() -> Attributes {
    Attributes::new()
}

impl Attributes {
    /// Creates an empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder form of [`Attributes::insert`].
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Binds `handler` to the event `event` (stored as `on{event}`).
    #[must_use]
    pub fn on(self, event: &str, handler: impl Fn(&mut Event) + 'static) -> Self {
        self.set(format!("on{event}"), EventHandler::new(handler))
    }

    /// Sets the `class` attribute.
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.set("class", class.into())
    }

    /// Sets the `style` attribute.
    #[must_use]
    pub fn style(self, style: StyleMap) -> Self {
        self.set("style", style)
    }

    /// Sets `name`, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Option<AttrValue> {
        let name = name.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((name, value));
        None
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find_map(|(n, value)| (n == name).then_some(value))
    }

    /// Removes an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Overlays `other` on top of these attributes; `other` wins on conflicts.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
        self
    }

    /// Iterates over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_markup_conventions() {
        assert!(!AttrValue::Null.is_truthy());
        assert!(!AttrValue::from(false).is_truthy());
        assert!(!AttrValue::from("").is_truthy());
        assert!(!AttrValue::from(0).is_truthy());
        assert!(!AttrValue::Number(f64::NAN).is_truthy());
        assert!(AttrValue::from("yes").is_truthy());
        assert!(AttrValue::from(2).is_truthy());
        assert!(AttrValue::from(StyleMap::new()).is_truthy());
    }

    #[test]
    fn numbers_print_without_trailing_fraction() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut attributes = attrs().set("id", "a").set("class", "x");
        let previous = attributes.insert("id", "b");

        assert_eq!(previous, Some(AttrValue::from("a")));
        let names: Vec<_> = attributes.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "class"]);
        assert_eq!(attributes.get("id"), Some(&AttrValue::from("b")));
    }

    #[test]
    fn none_becomes_null() {
        let attributes = attrs().set("title", None::<&str>);
        assert_eq!(attributes.get("title"), Some(&AttrValue::Null));
    }

    #[test]
    fn style_names_are_normalized() {
        let style = StyleMap::new()
            .set("backgroundColor", "red")
            .set("--accent", "blue")
            .set("font-size", "12px");

        assert_eq!(style.get("background-color"), Some("red"));
        assert_eq!(style.get("backgroundColor"), Some("red"));
        assert_eq!(
            style.css_text(),
            "--accent: blue; background-color: red; font-size: 12px;"
        );
    }

    #[test]
    fn cleared_style_properties_are_left_out_of_css_text() {
        let mut style = StyleMap::new().set("color", "red");
        style.insert("display", None);
        assert_eq!(style.len(), 2);
        assert_eq!(style.css_text(), "color: red;");
    }

    #[test]
    fn merge_lets_the_overlay_win() {
        let base = attrs().set("href", "/a").set("class", "link");
        let merged = base.merge(attrs().set("class", "nav"));
        assert_eq!(merged.get("class"), Some(&AttrValue::from("nav")));
        assert_eq!(merged.get("href"), Some(&AttrValue::from("/a")));
    }
}
