// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget styles: named colors and fonts with derived state variants.

use std::collections::BTreeMap;
use std::rc::Rc;

use arbor_scene::{Color, Font, NodeError, PropValue, Props};
use thiserror::Error;

use crate::state::State;

/// Default accent color, used for text and thumbs.
pub const COLOR_DEFAULT: Color = Color::rgb(191, 131, 191);
/// Default background color.
pub const BACKGROUND_DEFAULT: Color = Color::rgb(20, 20, 24);

/// Brightness change for the `hovered` modifier, in percent.
pub const HOVERED_SHIFT: f64 = -14.4;
/// Brightness change for the `selected` modifier, in percent.
pub const SELECTED_SHIFT: f64 = 14.4;
/// Brightness change for the `checked` modifier, in percent.
pub const CHECKED_SHIFT: f64 = -20.0;
/// Saturation kept by the `locked` and `disabled` modifiers, in percent.
pub const LOCKED_SATURATION: f64 = 50.0;
/// Brightness change for the `locked` and `disabled` modifiers, in percent.
pub const LOCKED_SHIFT: f64 = -28.8;

/// A style lookup failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// The key is not set, has no default and no modifier to derive it from.
    #[error("unknown style key `{0}`")]
    UnknownKey(String),
    /// The key resolved to a value of another type.
    #[error("style key `{key}` is not a {expected}")]
    WrongType {
        /// The key looked up.
        key: String,
        /// The type the caller asked for.
        expected: &'static str,
    },
}

impl From<StyleError> for NodeError {
    fn from(err: StyleError) -> Self {
        Self::new(err.to_string())
    }
}

/// One style value.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// A color.
    Color(Color),
    /// A font.
    Font(Font),
    /// A number, such as a margin or a width.
    Number(f64),
    /// Free text.
    Text(String),
}

impl From<Color> for StyleValue {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

impl From<Font> for StyleValue {
    fn from(v: Font) -> Self {
        Self::Font(v)
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// A cascading bag of named style values.
///
/// [`Style::get`] looks a key up in this style, then in its parents, then in
/// the built-in defaults (`color`, `background`, `font`). If that fails and the
/// key has the form `base_modifier`, the base is resolved instead and, if it is
/// a color, transformed by the modifier:
///
/// | modifier              | transform                                   |
/// |-----------------------|---------------------------------------------|
/// | `hovered`             | brightness −14.4 %                          |
/// | `selected`            | brightness +14.4 %                          |
/// | `checked`             | brightness −20 %                            |
/// | `locked`, `disabled`  | halve saturation, then brightness −28.8 %   |
///
/// Other modifiers, and non-color bases, resolve to the base unchanged.
///
/// ```rust
/// use arbor_scene::Color;
/// use arbor_widgets::{State, Style};
///
/// let style = Style::new().with("background", Color::rgb(100, 100, 100));
/// assert_eq!(style.color("background_hovered").unwrap(), Color::rgb(86, 86, 86));
/// assert_eq!(
///     style.color_by_state("background", State::Selected).unwrap(),
///     Color::rgb(114, 114, 114),
/// );
/// assert!(style.get("nonsense").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    values: BTreeMap<String, StyleValue>,
    parent: Option<Rc<Style>>,
}

impl Style {
    /// A style with only the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A style that falls back to `parent` for keys it does not set.
    #[must_use]
    pub fn inherit(parent: Rc<Self>) -> Self {
        Self {
            values: BTreeMap::new(),
            parent: Some(parent),
        }
    }

    /// Builder form of [`Style::set`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a value in this style.
    pub fn set(&mut self, key: &str, value: impl Into<StyleValue>) {
        self.values.insert(key.to_owned(), value.into());
    }

    /// A style whose entries are the color and float arguments in `props`.
    ///
    /// Other argument types are skipped.
    #[must_use]
    pub fn from_props(props: &Props) -> Self {
        let mut style = Self::new();
        for (key, value) in props.iter() {
            match value {
                PropValue::Color(c) => style.set(key, *c),
                PropValue::Float(v) => style.set(key, *v),
                _ => {}
            }
        }
        style
    }

    /// This style's own color and number entries, as constructor arguments.
    #[must_use]
    pub fn to_props(&self) -> Props {
        let mut props = Props::new();
        for (key, value) in &self.values {
            match value {
                StyleValue::Color(c) => props.insert(key, *c),
                StyleValue::Number(v) => props.insert(key, *v),
                _ => {}
            }
        }
        props
    }

    /// Resolves `key`; see the type docs for the lookup order.
    pub fn get(&self, key: &str) -> Result<StyleValue, StyleError> {
        if let Some(value) = self.lookup(key) {
            return Ok(value.clone());
        }
        if let Some(value) = builtin(key) {
            return Ok(value);
        }
        let Some((base, modifier)) = key.rsplit_once('_') else {
            return Err(StyleError::UnknownKey(key.to_owned()));
        };
        let base_value = self
            .get(base)
            .map_err(|_| StyleError::UnknownKey(key.to_owned()))?;
        Ok(match base_value {
            StyleValue::Color(c) => StyleValue::Color(apply_modifier(c, modifier)),
            other => other,
        })
    }

    /// `get(base + state.suffix())`.
    pub fn get_by_state(&self, base: &str, state: State) -> Result<StyleValue, StyleError> {
        self.get(&format!("{base}{}", state.suffix()))
    }

    /// Resolves a color.
    pub fn color(&self, key: &str) -> Result<Color, StyleError> {
        match self.get(key)? {
            StyleValue::Color(c) => Ok(c),
            _ => Err(wrong_type(key, "color")),
        }
    }

    /// Resolves the color of `base` for a widget in `state`.
    pub fn color_by_state(&self, base: &str, state: State) -> Result<Color, StyleError> {
        self.color(&format!("{base}{}", state.suffix()))
    }

    /// Resolves a font.
    pub fn font(&self, key: &str) -> Result<Font, StyleError> {
        match self.get(key)? {
            StyleValue::Font(f) => Ok(f),
            _ => Err(wrong_type(key, "font")),
        }
    }

    /// Resolves a number.
    pub fn number(&self, key: &str) -> Result<f64, StyleError> {
        match self.get(key)? {
            StyleValue::Number(v) => Ok(v),
            _ => Err(wrong_type(key, "number")),
        }
    }

    /// Resolves a number, or `default` if the key is unknown.
    #[must_use]
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    fn lookup(&self, key: &str) -> Option<&StyleValue> {
        let mut style = self;
        loop {
            if let Some(v) = style.values.get(key) {
                return Some(v);
            }
            style = style.parent.as_deref()?;
        }
    }
}

fn builtin(key: &str) -> Option<StyleValue> {
    match key {
        "color" => Some(StyleValue::Color(COLOR_DEFAULT)),
        "background" => Some(StyleValue::Color(BACKGROUND_DEFAULT)),
        "font" => Some(StyleValue::Font(Font::default())),
        _ => None,
    }
}

fn wrong_type(key: &str, expected: &'static str) -> StyleError {
    StyleError::WrongType {
        key: key.to_owned(),
        expected,
    }
}

fn apply_modifier(color: Color, modifier: &str) -> Color {
    match modifier {
        "hovered" => modify_color(color, HOVERED_SHIFT),
        "selected" => modify_color(color, SELECTED_SHIFT),
        "checked" => modify_color(color, CHECKED_SHIFT),
        "locked" | "disabled" => modify_color(desaturate(color, LOCKED_SATURATION), LOCKED_SHIFT),
        _ => color,
    }
}

/// Scales each channel by `1 + percent / 100`, rounding and clamping to `0..=255`.
///
/// Alpha is kept.
#[must_use]
pub fn modify_color(color: Color, percent: f64) -> Color {
    let scale = |c: u8| channel(f64::from(c) * (1.0 + percent / 100.0));
    Color::rgba(scale(color.r), scale(color.g), scale(color.b), color.a)
}

/// Moves each channel towards the color's gray level, keeping `keep` percent of
/// the distance.
#[must_use]
pub fn desaturate(color: Color, keep: f64) -> Color {
    let gray = (f64::from(color.r) + f64::from(color.g) + f64::from(color.b)) / 3.0;
    let mix = |c: u8| channel(gray + (f64::from(c) - gray) * keep / 100.0);
    Color::rgba(mix(color.r), mix(color.g), mix(color.b), color.a)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is rounded and clamped into the u8 range first."
)]
fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{BACKGROUND_DEFAULT, COLOR_DEFAULT, Style, StyleError, StyleValue, modify_color};
    use crate::state::State;
    use arbor_scene::{Color, Font, Props};

    #[test]
    fn defaults_cover_color_background_and_font() {
        let style = Style::new();
        assert_eq!(style.color("color"), Ok(COLOR_DEFAULT));
        assert_eq!(style.color("background"), Ok(BACKGROUND_DEFAULT));
        assert_eq!(style.font("font"), Ok(Font::default()));
    }

    #[test]
    fn explicit_state_keys_win_over_derived_ones() {
        let style = Style::new()
            .with("background", Color::rgb(100, 100, 100))
            .with("background_hovered", Color::rgb(1, 2, 3));
        assert_eq!(style.color("background_hovered"), Ok(Color::rgb(1, 2, 3)));
        assert_eq!(
            style.color_by_state("background", State::Idle),
            Ok(Color::rgb(100, 100, 100))
        );
    }

    #[test]
    fn locked_desaturates_then_darkens() {
        let style = Style::new().with("background", Color::rgb(200, 100, 0));
        // Gray level 100; half saturation gives (150, 100, 50); then -28.8 %.
        assert_eq!(
            style.color_by_state("background", State::Locked),
            Ok(Color::rgb(107, 71, 36))
        );
        assert_eq!(style.color("background_disabled"), style.color("background_locked"));
    }

    #[test]
    fn modifiers_chain_and_fonts_pass_through() {
        let style = Style::new().with("color", Color::rgb(100, 100, 100));
        // `color_error` has an unknown modifier and resolves to `color`.
        assert_eq!(
            style.color("color_error_hovered"),
            Ok(Color::rgb(86, 86, 86))
        );
        assert_eq!(style.font("font_hovered"), Ok(Font::default()));
    }

    #[test]
    fn unknown_keys_are_errors() {
        let style = Style::new();
        assert_eq!(
            style.get("margin"),
            Err(StyleError::UnknownKey("margin".into()))
        );
        assert_eq!(
            style.get("thumb_hovered"),
            Err(StyleError::UnknownKey("thumb_hovered".into()))
        );
        assert!(matches!(
            style.number("color"),
            Err(StyleError::WrongType { .. })
        ));
        assert_eq!(style.number_or("margin", 4.0), 4.0);
    }

    #[test]
    fn parents_are_consulted_before_defaults() {
        let parent = Rc::new(Style::new().with("background", Color::rgb(50, 50, 50)));
        let child = Style::inherit(parent).with("color", Color::WHITE);
        assert_eq!(child.color("background"), Ok(Color::rgb(50, 50, 50)));
        assert_eq!(child.color("background_selected"), Ok(Color::rgb(57, 57, 57)));
        assert_eq!(child.color("color"), Ok(Color::WHITE));
    }

    #[test]
    fn props_round_trip_colors_and_numbers() {
        let props = Props::new()
            .with("background", Color::rgb(1, 1, 1))
            .with("margin", 3.0)
            .with("label", "ignored");
        let style = Style::from_props(&props);
        assert_eq!(style.get("margin"), Ok(StyleValue::Number(3.0)));
        let back = style.to_props();
        assert_eq!(back.len(), 2);
        assert_eq!(back.get_color("background"), Ok(Some(Color::rgb(1, 1, 1))));
    }

    #[test]
    fn modify_color_clamps() {
        assert_eq!(modify_color(Color::rgb(250, 0, 128), 14.4), Color::rgb(255, 0, 146));
        assert_eq!(modify_color(Color::rgb(10, 20, 30), -200.0), Color::BLACK);
    }
}
