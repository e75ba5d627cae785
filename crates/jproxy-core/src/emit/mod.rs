//! Java source emission for proxy classes

mod class;
mod method;

pub use class::{ProxyClassSpec, ProxySourceEmitter};
pub use method::MethodBodyEmitter;

use serde::{Deserialize, Serialize};

const INDENT: &str = "    ";

/// Class literal used for primitive parameters in the reflective lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKeys {
    /// `java.lang.Integer.class` for an `int` parameter
    #[default]
    Boxed,
    /// `int.class`, which is what `Class.getMethod` matches
    Primitive,
}

/// Line-oriented source accumulator
#[derive(Debug, Default)]
pub struct SourceBuilder {
    text: String,
}

impl SourceBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the given indentation depth
    pub fn line(&mut self, depth: usize, content: &str) {
        for _ in 0..depth {
            self.text.push_str(INDENT);
        }
        self.text.push_str(content);
        self.text.push('\n');
    }

    /// Append an empty line
    pub fn blank(&mut self) {
        self.text.push('\n');
    }

    /// Accumulated text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Finish and take the text
    pub fn finish(self) -> String {
        self.text
    }
}

/// Synthesized local names `val0, val1, ...`
///
/// Each method body owns a fresh instance, so numbering always restarts
/// at `val0`.
#[derive(Debug, Default)]
pub struct ValueNames {
    next: usize,
}

impl ValueNames {
    /// Counter starting at `val0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused name
    pub fn next_name(&mut self) -> String {
        let name = format!("val{}", self.next);
        self.next += 1;
        name
    }

    /// `count` consecutive names
    pub fn take(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_names_are_sequential_per_instance() {
        let mut first = ValueNames::new();
        assert_eq!(first.take(3), vec!["val0", "val1", "val2"]);
        let mut second = ValueNames::new();
        assert_eq!(second.next_name(), "val0");
        assert_eq!(first.next_name(), "val3");
    }

    #[test]
    fn builder_indents_with_four_spaces() {
        let mut out = SourceBuilder::new();
        out.line(0, "class A {");
        out.line(2, "x();");
        out.blank();
        assert_eq!(out.finish(), "class A {\n        x();\n\n");
    }
}
