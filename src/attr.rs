//! Attribute system for page elements
//!
//! - Direct `Vec<(String, String)>` for attributes (document order kept)
//! - `class` is the only attribute with structure: a whitespace-separated set

/// Element attributes as simple key-value pairs
pub type Attrs = Vec<(String, String)>;

/// Extension trait for attribute operations on Attrs
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Check if an attribute exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (insert or update)
    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>);

    /// Remove an attribute by name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<String>;

    /// Iterate over the tokens of the `class` attribute
    fn classes(&self) -> Classes<'_>;

    /// Check if the `class` attribute contains `class` as a whole token
    fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| k == &name) {
            attr.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }

    fn classes(&self) -> Classes<'_> {
        Classes {
            inner: self.get_attr("class").unwrap_or_default().split_ascii_whitespace(),
        }
    }
}

/// Iterator over `class` tokens
pub struct Classes<'a> {
    inner: std::str::SplitAsciiWhitespace<'a>,
}

impl<'a> Iterator for Classes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Join class tokens back into a `class` attribute value, dropping `exclude`.
pub(crate) fn join_classes<'a>(classes: impl Iterator<Item = &'a str>, exclude: &str) -> String {
    let mut out = String::new();
    for class in classes.filter(|c| *c != exclude) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(class);
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
