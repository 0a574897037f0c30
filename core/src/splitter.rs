//! Splitting raw script text into individually executable SQL statements.
//!
//! A migration script is a single text blob holding any number of
//! `;`-terminated statements. [`split_statements`] decomposes it into an
//! ordered sequence of trimmed statements, preserving source order since
//! later statements routinely depend on earlier ones (a table created by
//! statement 1 and altered by statement 2).
//!
//! The scanner is quote- and comment-aware: a `;` inside a `'…'` or `"…"`
//! literal, a `--` line comment, or a `/* … */` block comment never
//! terminates a statement.
//!
//! Scripts must terminate every clause with `;` — text after the final
//! semicolon is not emitted as a statement. Callers that care (the engine
//! does) can detect such a dangling fragment via
//! [`split_with_remainder`].

/// Literal backslash-escape text some script generators leave behind in
/// place of real line breaks. Stripped before scanning.
const LITERAL_CRLF: &str = "\\r\\n";

#[derive(Clone, Copy, PartialEq)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// Splits script text into an ordered list of trimmed SQL statements.
///
/// Each returned statement includes its terminating semicolon. Statements
/// that are empty after trimming (runs of `;;`) are dropped. Text after
/// the final semicolon is not returned; see [`split_with_remainder`] to
/// observe it.
///
/// # Examples
///
/// ```
/// use script_migrate_core::split_statements;
///
/// let statements = split_statements(
///     "CREATE TABLE t (x int);\r\nINSERT INTO t VALUES (1);",
/// );
/// assert_eq!(
///     statements,
///     vec!["CREATE TABLE t (x int);", "INSERT INTO t VALUES (1);"],
/// );
/// ```
pub fn split_statements(text: &str) -> Vec<String> {
    split_with_remainder(text).0
}

/// Splits script text, additionally returning any unterminated trailing
/// fragment.
///
/// The second element is `Some` when the script ends with SQL text that
/// was never terminated by a semicolon (trailing whitespace and comments
/// do not count). Such a fragment is never executed; surfacing it lets
/// callers flag scripts that violate the terminator convention.
pub fn split_with_remainder(text: &str) -> (Vec<String>, Option<String>) {
    let cleaned = text.replace(LITERAL_CRLF, "");

    let mut statements = Vec::new();
    let mut start = 0usize;
    let mut state = State::Normal;
    // Tracks whether the chunk since the last boundary holds anything
    // other than whitespace and comments.
    let mut has_content = false;

    let mut chars = cleaned.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match state {
            State::Normal => match c {
                '\'' => {
                    state = State::SingleQuoted;
                    has_content = true;
                }
                '"' => {
                    state = State::DoubleQuoted;
                    has_content = true;
                }
                '-' if matches!(chars.peek(), Some(&(_, '-'))) => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if matches!(chars.peek(), Some(&(_, '*'))) => {
                    chars.next();
                    state = State::BlockComment;
                }
                ';' => {
                    let chunk = cleaned[start..=i].trim();
                    if has_content {
                        statements.push(chunk.to_string());
                    }
                    start = i + 1;
                    has_content = false;
                }
                _ => {
                    if !c.is_whitespace() {
                        has_content = true;
                    }
                }
            },
            State::SingleQuoted => {
                // A doubled '' re-enters the literal on the next quote,
                // so no explicit escape handling is needed.
                if c == '\'' {
                    state = State::Normal;
                }
            }
            State::DoubleQuoted => {
                if c == '"' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if c == '*' && matches!(chars.peek(), Some(&(_, '/'))) {
                    chars.next();
                    state = State::Normal;
                }
            }
        }
    }

    let remainder = if has_content {
        Some(cleaned[start..].trim().to_string())
    } else {
        None
    };

    (statements, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_statements_with_crlf() {
        let statements =
            split_statements("CREATE TABLE t (x int);\r\nINSERT INTO t VALUES (1);");
        assert_eq!(
            statements,
            vec!["CREATE TABLE t (x int);", "INSERT INTO t VALUES (1);"]
        );
    }

    #[test]
    fn test_order_matches_source_order() {
        let statements = split_statements(
            "CREATE TABLE a (id int);\nALTER TABLE a ADD name varchar(50);\nINSERT INTO a VALUES (1, 'x');",
        );
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE"));
        assert!(statements[1].starts_with("ALTER"));
        assert!(statements[2].starts_with("INSERT"));
    }

    #[test]
    fn test_semicolon_inside_single_quoted_literal() {
        let statements =
            split_statements("INSERT INTO t VALUES ('a;b');\nINSERT INTO t VALUES ('c');");
        assert_eq!(
            statements,
            vec![
                "INSERT INTO t VALUES ('a;b');",
                "INSERT INTO t VALUES ('c');"
            ]
        );
    }

    #[test]
    fn test_semicolon_inside_doubled_quote_escape() {
        let statements = split_statements("INSERT INTO t VALUES ('it''s; fine');");
        assert_eq!(statements, vec!["INSERT INTO t VALUES ('it''s; fine');"]);
    }

    #[test]
    fn test_semicolon_inside_double_quoted_identifier() {
        let statements = split_statements("SELECT \"odd;name\" FROM t;");
        assert_eq!(statements, vec!["SELECT \"odd;name\" FROM t;"]);
    }

    #[test]
    fn test_semicolon_inside_line_comment() {
        let statements = split_statements("-- setup; not a boundary\nCREATE TABLE t (x int);");
        assert_eq!(
            statements,
            vec!["-- setup; not a boundary\nCREATE TABLE t (x int);"]
        );
    }

    #[test]
    fn test_semicolon_inside_block_comment() {
        let statements = split_statements("/* a; b; c */ CREATE TABLE t (x int);");
        assert_eq!(statements, vec!["/* a; b; c */ CREATE TABLE t (x int);"]);
    }

    #[test]
    fn test_literal_crlf_escape_text_is_stripped() {
        let statements = split_statements("CREATE TABLE t (x int);\\r\\nINSERT INTO t VALUES (1);");
        assert_eq!(
            statements,
            vec!["CREATE TABLE t (x int);", "INSERT INTO t VALUES (1);"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("   \n\t  ").is_empty());
    }

    #[test]
    fn test_repeated_semicolons_are_dropped() {
        let statements = split_statements("SELECT 1;;;SELECT 2;");
        assert_eq!(statements, vec!["SELECT 1;", "SELECT 2;"]);
    }

    #[test]
    fn test_unterminated_tail_is_not_emitted() {
        let (statements, remainder) =
            split_with_remainder("CREATE TABLE t (x int);\nINSERT INTO t VALUES (1)");
        assert_eq!(statements, vec!["CREATE TABLE t (x int);"]);
        assert_eq!(remainder.as_deref(), Some("INSERT INTO t VALUES (1)"));
    }

    #[test]
    fn test_trailing_comment_is_not_a_remainder() {
        let (statements, remainder) =
            split_with_remainder("CREATE TABLE t (x int);\n-- done\n/* all applied */\n");
        assert_eq!(statements, vec!["CREATE TABLE t (x int);"]);
        assert!(remainder.is_none());
    }

    #[test]
    fn test_division_operator_is_not_a_comment() {
        let statements = split_statements("SELECT 4/2;");
        assert_eq!(statements, vec!["SELECT 4/2;"]);
    }

    #[test]
    fn test_multiline_statement_kept_whole() {
        let statements = split_statements(
            "CREATE TABLE t (\n    id INTEGER PRIMARY KEY,\n    name TEXT\n);",
        );
        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("PRIMARY KEY"));
    }
}
