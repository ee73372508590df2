//! Formatting of collected SQL
//!
//! Statements are tokenized with `sqlparser` and re-emitted token by token:
//! words are re-cased, quoted identifiers optionally unquoted and comments
//! optionally stripped. String literals and whitespace come out as written.

use crate::config::{LetterCase, SqlFormatOptions};
use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace, Word};
use tracing::warn;

fn apply_case(word: &str, case: LetterCase) -> String {
    match case {
        LetterCase::Upper => word.to_uppercase(),
        LetterCase::Lower => word.to_lowercase(),
        LetterCase::Capitalize => {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        }
        LetterCase::Preserve => word.to_string(),
    }
}

// Words around a `.` or after a `:` are parts of a name, never keywords
fn is_name_part(tokens: &[Token], index: usize) -> bool {
    let previous = index.checked_sub(1).and_then(|i| tokens.get(i));
    matches!(previous, Some(Token::Period | Token::Colon))
        || matches!(tokens.get(index + 1), Some(Token::Period))
}

#[derive(Debug, Clone)]
pub struct SqlFormatter {
    options: SqlFormatOptions,
}

impl SqlFormatter {
    pub fn new(options: SqlFormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SqlFormatOptions {
        &self.options
    }

    /// Format `sql`; input the tokenizer rejects is returned unchanged
    pub fn format(&self, sql: &str) -> String {
        let tokens = match Tokenizer::new(&GenericDialect {}, sql)
            .with_unescape(false)
            .tokenize()
        {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Leaving SQL unformatted");
                return sql.to_string();
            }
        };

        let formatted = self.format_tokens(&tokens);
        if self.options.reindent {
            reindent(&formatted)
        } else {
            formatted
        }
    }

    fn format_tokens(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for (index, token) in tokens.iter().enumerate() {
            match token {
                Token::Word(word) => {
                    out.push_str(&self.format_word(word, is_name_part(tokens, index)));
                }
                Token::Whitespace(Whitespace::SingleLineComment { comment, .. })
                    if self.options.strip_comments =>
                {
                    if comment.ends_with('\n') {
                        out.push('\n');
                    }
                }
                Token::Whitespace(Whitespace::MultiLineComment(_))
                    if self.options.strip_comments => {}
                other => out.push_str(&other.to_string()),
            }
        }
        out
    }

    fn format_word(&self, word: &Word, name_part: bool) -> String {
        match word.quote_style {
            Some('"') if self.options.unquote => {
                apply_case(&word.value, self.options.identifier_case)
            }
            Some(_) => word.to_string(),
            None if word.keyword != Keyword::NoKeyword && !name_part => {
                apply_case(&word.value, self.options.keyword_case)
            }
            None => apply_case(&word.value, self.options.identifier_case),
        }
    }
}

// First line flush left, continuation lines indented by four spaces
fn reindent(sql: &str) -> String {
    sql.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(n, line)| if n == 0 { line.to_string() } else { format!("    {}", line) })
        .collect::<Vec<_>>()
        .join("\n")
}
