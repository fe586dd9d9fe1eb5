use std::fmt;

/// Ordered command-line fragments rendered as one space separated string.
///
/// Fragments are not escaped; callers quote values themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    fragments: Vec<String>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment, usually built with `format!`.
    pub fn add(&mut self, fragment: impl Into<String>) -> &mut Self {
        self.fragments.push(fragment.into());
        self
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Join the fragments with single spaces, in insertion order.
    pub fn render(&self) -> String {
        self.fragments.join(" ")
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
