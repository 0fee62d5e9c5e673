//! Single-line `def` signature parsing.
//!
//! Only the forms this tool rewrites are understood: the whole signature on
//! one line, comma-separated arguments, an optional `->` annotation. Commas
//! inside brackets or string literals are not treated as separators.

use lazy_static::lazy_static;
use regex::Regex;

use super::{DocError, ParameterSpec, Signature};

lazy_static! {
    static ref DEF_START: Regex = Regex::new(r"^(?:async\s+)?def\s").unwrap();
    static ref DEF_NAME: Regex = Regex::new(r"^(?:async\s+)?def\s+([^\s(:]+)").unwrap();
}

/// Name of the function defined on `line`, if it is a definition line.
pub fn definition_name(line: &str) -> Option<&str> {
    DEF_NAME
        .captures(line.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether the line starts a function definition, `async` or not.
pub fn is_definition(line: &str) -> bool {
    DEF_START.is_match(line.trim_start())
}

/// Split `s` on `sep` where it is not nested in brackets or quotes.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Byte offset of the bracket closing the one opened at `open`.
fn matching_close(s: &str, open: usize) -> Option<usize> {
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop a trailing `# comment` that is not inside a string literal.
pub fn strip_comment(s: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '#' => return &s[..i],
            _ => {}
        }
    }
    s
}

/// Remove one layer of parentheses around `s`.
///
/// A fully wrapped expression loses its outer pair. Otherwise a stray
/// unmatched `(` at the start or `)` at the end is dropped.
pub fn strip_parens(s: &str) -> &str {
    let s = s.trim();
    if s.starts_with('(') && matching_close(s, 0) == Some(s.len() - 1) {
        return s[1..s.len() - 1].trim();
    }
    let opens = s.matches('(').count();
    let closes = s.matches(')').count();
    if s.starts_with('(') && opens > closes {
        s[1..].trim()
    } else if s.ends_with(')') && closes > opens {
        s[..s.len() - 1].trim()
    } else {
        s
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse one argument chunk: `name[: type][= default]`.
fn parse_argument(chunk: &str) -> ParameterSpec {
    let (rest, default_value) = match chunk.split_once('=') {
        Some((rest, default)) => (rest, non_empty(default)),
        None => (chunk, None),
    };
    let (name, declared_type) = match rest.split_once(':') {
        Some((name, ty)) => (name, non_empty(ty)),
        None => (rest, None),
    };
    ParameterSpec {
        name: name.trim().to_string(),
        declared_type,
        default_value,
    }
}

/// Parse the output annotation that follows the argument list.
fn parse_output_types(tail: &str) -> Vec<String> {
    let tail = strip_comment(tail).trim();
    let Some(pos) = tail.find("->") else {
        return Vec::new();
    };
    let annotation = tail[pos + 2..].trim();
    let annotation = annotation.strip_suffix(':').unwrap_or(annotation);
    let annotation = strip_parens(annotation);

    split_top_level(annotation, ',')
        .into_iter()
        .filter_map(non_empty)
        .collect()
}

/// Parse a definition line into a [`Signature`].
///
/// `line_no` is 0-indexed and only used for error reporting. Non-fatal
/// problems come back alongside the signature.
pub fn parse_definition(line: &str, line_no: usize) -> Result<(Signature, Vec<DocError>), DocError> {
    let name = definition_name(line).unwrap_or_default().to_string();
    let text = line.trim();
    let unbalanced = || DocError::UnbalancedSignature {
        function: name.clone(),
        line: line_no + 1,
    };

    let open = text.find('(').ok_or_else(unbalanced)?;
    let close = matching_close(text, open).ok_or_else(unbalanced)?;
    if !text[open..=close].ends_with(')') {
        return Err(unbalanced());
    }

    let args = &text[open + 1..close];
    let mut params = Vec::new();
    let mut warnings = Vec::new();

    if !args.trim().is_empty() {
        for chunk in split_top_level(args, ',') {
            let param = parse_argument(chunk);
            // Bare `*` and `/` only mark keyword-only / positional-only sections.
            if param.name == "*" || param.name == "/" {
                continue;
            }
            if param.name.is_empty() {
                warnings.push(DocError::EmptyParameterName {
                    function: name.clone(),
                    line: line_no + 1,
                });
                continue;
            }
            params.push(param);
        }
    }

    let signature = Signature {
        output_types: parse_output_types(&text[close + 1..]),
        name,
        params,
    };
    Ok((signature, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Signature {
        parse_definition(line, 0).unwrap().0
    }

    #[test]
    fn test_definition_name() {
        assert_eq!(definition_name("def foo(x):"), Some("foo"));
        assert_eq!(definition_name("    def bar (self):"), Some("bar"));
        assert_eq!(definition_name("x = 1"), None);
        assert!(is_definition("  def f():"));
        assert!(!is_definition("define = 3"));
    }

    #[test]
    fn test_async_definition() {
        assert!(is_definition("    async def fetch(self, url):"));
        assert!(!is_definition("async_def = 1"));
        assert_eq!(definition_name("async  def fetch(url):"), Some("fetch"));

        let sig = parse("async def fetch(url: str) -> bytes:");
        assert_eq!(sig.name, "fetch");
        assert_eq!(
            sig.params,
            vec![ParameterSpec {
                name: "url".to_string(),
                declared_type: Some("str".to_string()),
                default_value: None,
            }]
        );
        assert_eq!(sig.output_types, vec!["bytes".to_string()]);
    }

    #[test]
    fn test_type_and_default() {
        let sig = parse("def f(x: int = 0, y) -> int:");
        assert_eq!(sig.name, "f");
        assert_eq!(
            sig.params,
            vec![
                ParameterSpec {
                    name: "x".to_string(),
                    declared_type: Some("int".to_string()),
                    default_value: Some("0".to_string()),
                },
                ParameterSpec::new("y"),
            ]
        );
        assert_eq!(sig.output_types, vec!["int".to_string()]);
    }

    #[test]
    fn test_default_without_type() {
        let sig = parse("def f(a=None, b: str='x'):");
        assert_eq!(sig.params[0].declared_type, None);
        assert_eq!(sig.params[0].default_value.as_deref(), Some("None"));
        assert_eq!(sig.params[1].declared_type.as_deref(), Some("str"));
        assert_eq!(sig.params[1].default_value.as_deref(), Some("'x'"));
        assert!(sig.output_types.is_empty());
    }

    #[test]
    fn test_no_annotation_keeps_last_name_clean() {
        let sig = parse("def f(x, y):");
        let names: Vec<_> = sig.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_nested_commas_are_not_split() {
        let sig = parse("def f(a: Dict[str, int], b=(1, 2)) -> Tuple[int, str]:");
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0].declared_type.as_deref(), Some("Dict[str, int]"));
        assert_eq!(sig.params[1].default_value.as_deref(), Some("(1, 2)"));
        assert_eq!(sig.output_types, vec!["Tuple[int, str]".to_string()]);
    }

    #[test]
    fn test_multiple_output_types() {
        let sig = parse("def f(x) -> str, int:");
        assert_eq!(sig.output_types, vec!["str".to_string(), "int".to_string()]);

        let sig = parse("def f(x) -> (str, int):");
        assert_eq!(sig.output_types, vec!["str".to_string(), "int".to_string()]);
    }

    #[test]
    fn test_trailing_comment_ignored() {
        let sig = parse("def f(x) -> dict:  # returns a mapping");
        assert_eq!(sig.output_types, vec!["dict".to_string()]);
    }

    #[test]
    fn test_zero_parameters() {
        let (sig, warnings) = parse_definition("def f():", 0).unwrap();
        assert!(sig.params.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_stray_comma_warns() {
        let (sig, warnings) = parse_definition("def f(a, ):", 4).unwrap();
        assert_eq!(sig.params.len(), 1);
        assert_eq!(
            warnings,
            vec![DocError::EmptyParameterName {
                function: "f".to_string(),
                line: 5,
            }]
        );
    }

    #[test]
    fn test_star_markers_skipped() {
        let sig = parse("def f(a, *, b=1, **kwargs):");
        let names: Vec<_> = sig.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "**kwargs"]);
    }

    #[test]
    fn test_unbalanced_signature() {
        let err = parse_definition("def f(a, b:", 9).unwrap_err();
        assert_eq!(
            err,
            DocError::UnbalancedSignature {
                function: "f".to_string(),
                line: 10,
            }
        );
        assert!(parse_definition("def f:", 0).is_err());
    }

    #[test]
    fn test_split_top_level_respects_quotes() {
        assert_eq!(split_top_level("a='x,y', b", ','), vec!["a='x,y'", " b"]);
        assert_eq!(split_top_level("", ','), vec![""]);
    }

    #[test]
    fn test_strip_parens() {
        assert_eq!(strip_parens("(a, b)"), "a, b");
        assert_eq!(strip_parens("(a"), "a");
        assert_eq!(strip_parens("b)"), "b");
        assert_eq!(strip_parens("f(a)"), "f(a)");
        assert_eq!(strip_parens("(a) + (b)"), "(a) + (b)");
    }
}
