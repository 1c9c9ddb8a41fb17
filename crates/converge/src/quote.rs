//! SQL identifier quoting for PostgreSQL-protocol servers
//!
//! Names are always rendered as delimited identifiers (`"name"`), never as
//! string values. A name may already carry its own delimiters (`"My Db"`),
//! in which case it is taken as-is.
//!
//! Dotted names are split into fragments (`schema.table`). Each kind of
//! object allows a fixed number of fragments; a database name allows one.
//!
//! The server silently truncates each fragment to 63 bytes, so a longer
//! name would be created under a spelling the catalog lookup never finds.
//! Such names are rejected instead.

use std::fmt;
use thiserror::Error;

const QUOTE: char = '"';

/// `NAMEDATALEN - 1` on a stock PostgreSQL build
const MAX_IDENTIFIER_BYTES: usize = 63;

/// Kind of schema object an identifier names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Database,
    Role,
    Tablespace,
    Schema,
    Table,
    Sequence,
    Function,
    Column,
}

impl IdentifierKind {
    /// Maximum number of dot-separated fragments for this kind
    pub fn max_fragments(self) -> usize {
        match self {
            Self::Database | Self::Role | Self::Tablespace => 1,
            Self::Schema => 2,
            Self::Table | Self::Sequence | Self::Function => 3,
            Self::Column => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Role => "role",
            Self::Tablespace => "tablespace",
            Self::Schema => "schema",
            Self::Table => "table",
            Self::Sequence => "sequence",
            Self::Function => "function",
            Self::Column => "column",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a name cannot be rendered as an identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// Empty name, empty quoted name, or an unquoted trailing dot
    #[error("identifier name unspecified or unquoted trailing dot")]
    Empty,

    /// NUL cannot appear in an identifier
    #[error("identifier {0:?} contains a NUL byte")]
    Nul(String),

    /// A user-quoted fragment is followed by something other than a dot
    #[error("user escaped identifiers must escape extra quotes: {0}")]
    UnescapedQuote(String),

    /// Too many dot-separated fragments for the object kind
    #[error("{kind} names cannot have more than {max} dot-separated part(s): {name}")]
    TooManyDots {
        kind: IdentifierKind,
        max: usize,
        name: String,
    },

    /// A fragment is longer than the server keeps
    #[error("identifier {name:?} is longer than {max} bytes")]
    TooLong { name: String, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    quoted: String,
    raw: String,
}

impl Fragment {
    fn bare(name: &str) -> Self {
        Self {
            quoted: format!("{QUOTE}{}{QUOTE}", name.replace(QUOTE, "\"\"")),
            raw: name.to_string(),
        }
    }

    fn user_quoted(body: &str) -> Self {
        Self {
            quoted: format!("{QUOTE}{body}{QUOTE}"),
            raw: body.replace("\"\"", "\""),
        }
    }
}

/// A name rendered safely as an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    kind: IdentifierKind,
    quoted: String,
    catalog_name: String,
}

impl Identifier {
    /// Identifier text for interpolation into a statement
    pub fn quoted(&self) -> &str {
        &self.quoted
    }

    /// Name as stored in the system catalog (the last fragment, unescaped).
    ///
    /// Bind this as a parameter value; never interpolate it.
    pub fn catalog_name(&self) -> &str {
        &self.catalog_name
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted)
    }
}

/// Quote `name` as an identifier of the given kind.
///
/// Embedded double quotes are doubled and the result is wrapped in double
/// quotes. Fails on empty or NUL-bearing names, on malformed user quoting,
/// on more fragments than `kind` allows, and on fragments longer than
/// 63 bytes once unescaped.
pub fn quote_identifier(name: &str, kind: IdentifierKind) -> Result<Identifier, QuoteError> {
    if name.contains('\0') {
        return Err(QuoteError::Nul(name.to_string()));
    }

    let fragments = parse_fragments(name)?;
    let max = kind.max_fragments();
    if fragments.len() > max {
        return Err(QuoteError::TooManyDots {
            kind,
            max,
            name: name.to_string(),
        });
    }

    if let Some(long) = fragments.iter().find(|f| f.raw.len() > MAX_IDENTIFIER_BYTES) {
        return Err(QuoteError::TooLong {
            name: long.raw.clone(),
            max: MAX_IDENTIFIER_BYTES,
        });
    }

    let quoted = fragments
        .iter()
        .map(|f| f.quoted.as_str())
        .collect::<Vec<_>>()
        .join(".");
    let catalog_name = fragments
        .last()
        .map(|f| f.raw.clone())
        .ok_or(QuoteError::Empty)?;

    Ok(Identifier {
        kind,
        quoted,
        catalog_name,
    })
}

fn parse_fragments(input: &str) -> Result<Vec<Fragment>, QuoteError> {
    if input.is_empty() {
        return Err(QuoteError::Empty);
    }

    if let Some(rest) = input.strip_prefix(QUOTE) {
        // An unterminated leading quote falls through and is escaped as data
        if let Some(end) = closing_quote(rest) {
            let body = &rest[..end];
            if body.is_empty() {
                return Err(QuoteError::Empty);
            }
            let first = Fragment::user_quoted(body);
            let after = &rest[end + 1..];
            if after.is_empty() {
                return Ok(vec![first]);
            }
            let Some(next) = after.strip_prefix('.') else {
                return Err(QuoteError::UnescapedQuote(input.to_string()));
            };
            let mut fragments = vec![first];
            fragments.extend(parse_fragments(next)?);
            return Ok(fragments);
        }
    }

    match input.find('.') {
        Some(dot) if dot > 0 && dot < input.len() - 1 => {
            let mut fragments = vec![Fragment::bare(&input[..dot])];
            fragments.extend(parse_fragments(&input[dot + 1..])?);
            Ok(fragments)
        }
        // A leading or trailing dot is part of the name
        _ => Ok(vec![Fragment::bare(input)]),
    }
}

/// Byte offset of the quote closing a quoted fragment, skipping `""` escapes
fn closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(name: &str) -> Result<Identifier, QuoteError> {
        quote_identifier(name, IdentifierKind::Database)
    }

    #[test]
    fn test_plain_name_is_wrapped() {
        let id = db("acme").unwrap();
        assert_eq!(id.quoted(), "\"acme\"");
        assert_eq!(id.catalog_name(), "acme");
        assert_eq!(id.to_string(), "\"acme\"");
    }

    #[test]
    fn test_mixed_case_and_spaces_keep_their_spelling() {
        let id = db("My Db").unwrap();
        assert_eq!(id.quoted(), "\"My Db\"");
        assert_eq!(id.catalog_name(), "My Db");
    }

    #[test]
    fn test_reserved_word() {
        assert_eq!(db("select").unwrap().quoted(), "\"select\"");
    }

    #[test]
    fn test_embedded_quote_is_doubled() {
        let id = db("we\"ird").unwrap();
        assert_eq!(id.quoted(), "\"we\"\"ird\"");
        assert_eq!(id.catalog_name(), "we\"ird");
    }

    #[test]
    fn test_injection_attempt_stays_inside_identifier() {
        let id = db("x\"; DROP DATABASE postgres; --").unwrap();
        assert_eq!(id.quoted(), "\"x\"\"; DROP DATABASE postgres; --\"");
    }

    #[test]
    fn test_user_quoted_name_is_kept() {
        let id = db("\"My Db\"").unwrap();
        assert_eq!(id.quoted(), "\"My Db\"");
        assert_eq!(id.catalog_name(), "My Db");

        let id = db("\"a\"\"b\"").unwrap();
        assert_eq!(id.quoted(), "\"a\"\"b\"");
        assert_eq!(id.catalog_name(), "a\"b");
    }

    #[test]
    fn test_unterminated_quote_is_escaped_as_data() {
        let id = db("\"abc").unwrap();
        assert_eq!(id.quoted(), "\"\"\"abc\"");
        assert_eq!(id.catalog_name(), "\"abc");
    }

    #[test]
    fn test_text_after_user_quote_is_rejected() {
        assert_eq!(
            db("\"abc\"def"),
            Err(QuoteError::UnescapedQuote("\"abc\"def".into()))
        );
    }

    #[test]
    fn test_empty_names_are_rejected() {
        assert_eq!(db(""), Err(QuoteError::Empty));
        assert_eq!(db("\"\""), Err(QuoteError::Empty));
        assert_eq!(
            quote_identifier("\"public\".", IdentifierKind::Schema),
            Err(QuoteError::Empty)
        );
    }

    #[test]
    fn test_nul_is_rejected() {
        assert!(matches!(db("ac\0me"), Err(QuoteError::Nul(_))));
    }

    #[test]
    fn test_dotted_database_name_is_rejected() {
        let err = db("a.b").unwrap_err();
        assert_eq!(
            err,
            QuoteError::TooManyDots {
                kind: IdentifierKind::Database,
                max: 1,
                name: "a.b".into()
            }
        );
    }

    #[test]
    fn test_leading_and_trailing_dots_are_part_of_the_name() {
        assert_eq!(db(".acme").unwrap().quoted(), "\".acme\"");
        assert_eq!(db("acme.").unwrap().quoted(), "\"acme.\"");
    }

    #[test]
    fn test_quoted_dot_is_one_fragment() {
        let id = db("\"a.b\"").unwrap();
        assert_eq!(id.quoted(), "\"a.b\"");
        assert_eq!(id.catalog_name(), "a.b");
    }

    #[test]
    fn test_multi_fragment_kinds() {
        let id = quote_identifier("public.users", IdentifierKind::Table).unwrap();
        assert_eq!(id.quoted(), "\"public\".\"users\"");
        assert_eq!(id.catalog_name(), "users");

        let id = quote_identifier("\"Sales\".orders.total", IdentifierKind::Column).unwrap();
        assert_eq!(id.quoted(), "\"Sales\".\"orders\".\"total\"");

        assert!(matches!(
            quote_identifier("a.b.c", IdentifierKind::Schema),
            Err(QuoteError::TooManyDots { max: 2, .. })
        ));
    }

    #[test]
    fn test_name_length_limit_is_in_bytes() {
        assert!(db(&"a".repeat(63)).is_ok());
        assert_eq!(
            db(&"a".repeat(70)),
            Err(QuoteError::TooLong {
                name: "a".repeat(70),
                max: 63
            })
        );
        // 64 bytes in 32 characters
        assert!(matches!(db(&"é".repeat(32)), Err(QuoteError::TooLong { .. })));
        assert!(db(&"é".repeat(31)).is_ok());
    }

    #[test]
    fn test_length_limit_counts_unescaped_text() {
        // 62 bytes once the doubled quote collapses
        let body = format!("{}\"\"{}", "a".repeat(30), "b".repeat(31));
        let id = db(&format!("\"{body}\"")).unwrap();
        assert_eq!(id.catalog_name().len(), 62);

        let long = quote_identifier(&format!("public.{}", "t".repeat(64)), IdentifierKind::Table);
        assert!(matches!(long, Err(QuoteError::TooLong { max: 63, .. })));
    }

    #[test]
    fn test_non_ascii_names() {
        let id = db("café").unwrap();
        assert_eq!(id.quoted(), "\"café\"");
        assert_eq!(id.catalog_name(), "café");
    }
}
