//! SQL rendering: identifier quoting, template-driven DDL and output formatting

pub mod format;
pub mod sql;

pub use format::SqlFormatter;

use crate::naming::split_identifier;
use serde::{Deserialize, Serialize};

pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// How a backend quotes identifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    /// Names are emitted as given
    #[default]
    Identity,
    /// Each part double-quoted, case preserved
    Ansi,
    /// Each part double-quoted and uppercased; quoted names are only uppercased
    Oracle,
}

impl QuoteStyle {
    pub fn quote_name(&self, name: &str) -> String {
        match self {
            QuoteStyle::Identity => name.to_string(),
            QuoteStyle::Ansi if name.starts_with('"') && name.ends_with('"') => name.to_string(),
            QuoteStyle::Ansi => quote_parts(name, quote_ident),
            QuoteStyle::Oracle => {
                if name.starts_with('"') && name.ends_with('"') {
                    return name.to_uppercase();
                }
                quote_parts(&name.to_uppercase(), quote_ident)
            }
        }
    }
}

fn quote_parts(name: &str, quote: fn(&str) -> String) -> String {
    let (namespace, object) = match split_identifier(name) {
        (namespace, object) if !namespace.is_empty() => (namespace, object),
        _ => match name.split_once('.') {
            Some((namespace, object)) => (namespace.to_string(), object.to_string()),
            None => (String::new(), name.to_string()),
        },
    };
    if namespace.is_empty() {
        quote(&object)
    } else {
        format!("{}.{}", quote(&namespace), quote(&object))
    }
}
