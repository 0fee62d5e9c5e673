//! Core types shared by the docstring pipeline.

use thiserror::Error;

/// A single argument recovered from a definition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub declared_type: Option<String>,
    pub default_value: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default_value: None,
        }
    }
}

/// Parsed form of a `def` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<ParameterSpec>,
    /// Declared output types, in `->` annotation order.
    pub output_types: Vec<String>,
}

impl Signature {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Insertion-ordered map from annotation key to description lines.
///
/// Re-inserting a key clears its lines but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    entries: Vec<(String, Vec<String>)>,
}

impl Sections {
    /// Start (or restart) the entry for `key` and return its position.
    pub fn start(&mut self, key: &str) -> usize {
        if let Some(idx) = self.entries.iter().position(|(k, _)| k == key) {
            self.entries[idx].1.clear();
            idx
        } else {
            self.entries.push((key.to_string(), Vec::new()));
            self.entries.len() - 1
        }
    }

    pub fn push_line(&mut self, idx: usize, line: impl Into<String>) {
        if let Some((_, lines)) = self.entries.get_mut(idx) {
            lines.push(line.into());
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, lines)| (k.as_str(), lines.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Content recovered from a plain docstring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub header: Vec<String>,
    pub params: Sections,
    pub returns: Sections,
}

/// Inclusive, 0-indexed line bounds of a docstring, delimiters included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl LineRange {
    pub fn contains(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Everything the scanner learned about one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    pub name: String,
    /// 0-indexed line of the `def`.
    pub def_line: usize,
    /// `None` when the definition line could not be parsed.
    pub signature: Option<Signature>,
    pub returns: Vec<String>,
    pub doc: Option<DocBlock>,
    pub range: Option<LineRange>,
    /// Leading whitespace of the opening delimiter line.
    pub indent: String,
}

impl FunctionRecord {
    pub fn new(name: impl Into<String>, def_line: usize, signature: Option<Signature>) -> Self {
        Self {
            name: name.into(),
            def_line,
            signature,
            returns: Vec::new(),
            doc: None,
            range: None,
            indent: String::new(),
        }
    }

    /// Whether the record carries everything needed to synthesize a block.
    pub fn is_convertible(&self) -> bool {
        self.signature.is_some() && self.doc.is_some() && self.range.is_some()
    }
}

/// Return values of a function that could not be matched to a documented return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionFinding {
    pub function: String,
    pub unmapped: Vec<String>,
}

/// Per-function problems. None of these abort processing of the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocError {
    #[error("line {line}: unbalanced parentheses in definition of `{function}`")]
    UnbalancedSignature { function: String, line: usize },
    #[error("line {line}: empty parameter name in definition of `{function}`")]
    EmptyParameterName { function: String, line: usize },
    #[error("line {line}: docstring of `{function}` is never closed")]
    UnterminatedDocstring { function: String, line: usize },
    #[error("line {line}: docstring of `{function}` left unchanged, redefined at line {redefined_at}")]
    Redefined {
        function: String,
        line: usize,
        redefined_at: usize,
    },
}

impl DocError {
    /// Whether the function's docstring was left unconverted.
    pub fn skips_function(&self) -> bool {
        !matches!(self, DocError::EmptyParameterName { .. })
    }
}
