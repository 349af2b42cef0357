use std::fmt;

/// Ordered list of inline style declarations
///
/// Parsing is lenient: declarations without a `:` are dropped, whitespace
/// around names and values is trimmed, and a repeated property keeps its
/// first position with the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(css: &str) -> Self {
        let mut style = Self::new();
        for declaration in css.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                let name = name.trim();
                if !name.is_empty() {
                    style.set(name, value.trim());
                }
            }
        }
        style
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.declarations.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value,
            None => self.declarations.push((property.to_string(), value)),
        }
    }

    /// Builder form of [`InlineStyle::set`]
    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn remove(&mut self, property: &str) {
        self.declarations.retain(|(name, _)| name != property);
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", name, value)?;
        }
        Ok(())
    }
}

/// Format a pixel length the way inline styles expect
pub(crate) fn px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{:.2}px", value)
    }
}
