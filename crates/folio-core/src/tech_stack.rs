// Chip-style input for a project's tech stack.

/// Ordered, duplicate-free list of technology labels plus the pending text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechStackInput {
    items: Vec<String>,
    input: String,
}

impl TechStackInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing list, dropping blanks and repeats.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stack = Self::new();
        for item in items {
            stack.add_value(item.as_ref());
        }
        stack
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Commit the pending text. The text is cleared only when it was accepted.
    pub fn add(&mut self) -> bool {
        let value = std::mem::take(&mut self.input);
        let added = self.add_value(&value);
        if !added {
            self.input = value;
        }
        added
    }

    /// Trim and append `value`; blanks and exact duplicates are rejected.
    pub fn add_value(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.items.iter().any(|item| item == value) {
            return false;
        }
        self.items.push(value.to_owned());
        true
    }

    /// Drop the label equal to `value`. Returns whether anything was removed.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != value);
        self.items.len() != before
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn into_items(self) -> Vec<String> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
