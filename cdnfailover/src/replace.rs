use std::collections::HashMap;

use regex::{Captures, Regex, RegexBuilder};

use crate::compile::MarkerPattern;
use crate::error::Result;

/// Opening delimiter of every marker: `<!-- cdnfailover:<name> -->`.
pub const DEFAULT_PREFIX: &str = "<!-- cdnfailover:";

/// Upper bound on the compiled matcher, in bytes.
pub const MATCHER_SIZE_LIMIT: usize = 10 * (1 << 20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub content: String,
    /// Number of markers replaced.
    pub count: usize,
}

/// Substitutes markers in a text. The pattern set is fixed when the
/// replacer is built, so replacing itself cannot fail.
pub trait PatternReplacer {
    fn replace(&self, text: &str) -> Replaced;
}

/// Replaces `prefix + marker` occurrences in one left-to-right scan.
///
/// Replacement text is never rescanned. Markers not present in the pattern
/// list are left as they are. When two patterns share a marker the first
/// one is used.
#[derive(Debug, Clone)]
pub struct MarkerReplacer {
    prefix: String,
    /// `None` when there are no patterns.
    matcher: Option<Regex>,
    replacements: HashMap<String, String>,
}

impl MarkerReplacer {
    pub fn compile(prefix: impl Into<String>, patterns: &[MarkerPattern]) -> Result<Self> {
        MarkerReplacer::compile_with_size_limit(prefix, patterns, MATCHER_SIZE_LIMIT)
    }
    pub fn compile_with_size_limit(
        prefix: impl Into<String>,
        patterns: &[MarkerPattern],
        size_limit: usize,
    ) -> Result<Self> {
        let prefix = prefix.into();
        let mut replacements = HashMap::<String, String>::with_capacity(patterns.len());
        for pattern in patterns {
            replacements
                .entry(pattern.marker.clone())
                .or_insert_with(|| pattern.replacement.clone());
        }
        let matcher = if patterns.is_empty() {
            None
        } else {
            let alternation = patterns
                .iter()
                .map(|x| regex::escape(&x.marker))
                .collect::<Vec<_>>()
                .join("|");
            let source = format!("{}({alternation})", regex::escape(&prefix));
            Some(RegexBuilder::new(&source).size_limit(size_limit).build()?)
        };
        Ok(MarkerReplacer { prefix, matcher, replacements })
    }
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl PatternReplacer for MarkerReplacer {
    fn replace(&self, text: &str) -> Replaced {
        let Some(matcher) = self.matcher.as_ref().filter(|_| text.contains(self.prefix.as_str())) else {
            return Replaced { content: text.to_owned(), count: 0 }
        };
        let mut count = 0usize;
        let content = matcher
            .replace_all(text, |captures: &Captures| {
                count += 1;
                self.replacements
                    .get(&captures[1])
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned();
        Replaced { content, count }
    }
}
