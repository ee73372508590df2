//! Placeholder templates used for table formats and object naming patterns
//!
//! A template is literal text mixed with `{name}` placeholders, anonymous `{}`
//! placeholders and `{{` / `}}` escapes. The same template can be matched
//! against a concrete name (extracting the placeholder values) or rendered
//! from a set of values.

use crate::error::{AdapterError, Result};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Named(String),
    Anonymous,
}

/// A parsed `{placeholder}` template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

/// Values extracted by a match, or supplied to a render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    pub named: BTreeMap<String, String>,
    pub positional: Vec<String>,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.named.insert(name.to_string(), value.into());
        self
    }

    pub fn with_positional(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.named.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Merge `other` into `self`; values from `other` win
    pub fn extend(&mut self, other: TemplateValues) {
        self.named.extend(other.named);
        self.positional.extend(other.positional);
    }
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(AdapterError::invalid_pattern(
                            source,
                            "unterminated '{' placeholder",
                        ));
                    }
                    let name = name.trim();
                    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        return Err(AdapterError::invalid_pattern(
                            source,
                            format!("'{}' is not a valid placeholder name", name),
                        ));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    if name.is_empty() {
                        segments.push(Segment::Anonymous);
                    } else {
                        segments.push(Segment::Named(name.to_string()));
                    }
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(AdapterError::invalid_pattern(
                        source,
                        "single '}' encountered",
                    ));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Named placeholders in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Named(name) = segment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// Whether rendering this template needs a value for `name`
    pub fn requires(&self, name: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Named(n) if n == name))
    }

    /// Match the whole of `text` against the template.
    ///
    /// Placeholders capture non-empty text, shortest candidate first. A named
    /// placeholder that appears more than once must capture the same text.
    /// Literal text and repeated captures compare ignoring ASCII case, so
    /// `django_{}` matches `DJANGO_SITE`. `None` means the text does not
    /// conform; it is not an error.
    pub fn matches(&self, text: &str) -> Option<TemplateValues> {
        let mut values = TemplateValues::new();
        if match_from(&self.segments, text, &mut values) {
            Some(values)
        } else {
            None
        }
    }

    pub fn render(&self, values: &TemplateValues) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut positional = values.positional.iter();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Named(name) => match values.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(AdapterError::MissingPlaceholder {
                            pattern: self.source.clone(),
                            placeholder: name.clone(),
                        });
                    }
                },
                Segment::Anonymous => match positional.next() {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(AdapterError::MissingPlaceholder {
                            pattern: self.source.clone(),
                            placeholder: String::new(),
                        });
                    }
                },
            }
        }

        Ok(out)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn match_from(segments: &[Segment], text: &str, values: &mut TemplateValues) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return text.is_empty();
    };

    match first {
        Segment::Literal(literal) => match strip_prefix_ignore_case(text, literal) {
            Some(remaining) => match_from(rest, remaining, values),
            None => false,
        },
        Segment::Named(name) => {
            if let Some(previous) = values.named.get(name).cloned() {
                return match strip_prefix_ignore_case(text, &previous) {
                    Some(remaining) => match_from(rest, remaining, values),
                    None => false,
                };
            }
            for end in capture_ends(text) {
                values.named.insert(name.clone(), text[..end].to_string());
                if match_from(rest, &text[end..], values) {
                    return true;
                }
            }
            values.named.remove(name);
            false
        }
        Segment::Anonymous => {
            for end in capture_ends(text) {
                values.positional.push(text[..end].to_string());
                if match_from(rest, &text[end..], values) {
                    return true;
                }
                values.positional.pop();
            }
            false
        }
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

/// Candidate end offsets for a non-empty capture, shortest first
fn capture_ends(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()).filter(|len| *len > 0))
}
