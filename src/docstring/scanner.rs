//! Line-oriented scanner that collects functions and their plain docstrings.

use tracing::{debug, warn};

use super::signature::{self, split_top_level, strip_comment, strip_parens};
use super::{DocBlock, DocError, FunctionRecord, LineRange};

/// Docstring delimiter recognised at the start of a line.
pub const DELIMITER: &str = "\"\"\"";

/// Annotation prefixes that start a parameter or return entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags {
    pub param: String,
    pub ret: String,
}

impl Default for Tags {
    fn default() -> Self {
        Self {
            param: ":param".to_string(),
            ret: ":return".to_string(),
        }
    }
}

/// Where the scanner currently is relative to a docstring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Header,
    /// Collecting lines for the parameter entry at this position.
    InParam(usize),
    /// Collecting lines for the return entry at this position.
    InReturn(usize),
}

/// A docstring that has been opened but not yet closed.
struct OpenDoc {
    owner: usize,
    start_line: usize,
    indent: String,
    block: DocBlock,
}

/// Output of scanning one file.
#[derive(Debug, Clone, Default)]
pub struct ScannedFile {
    /// One record per function name, in order of (last) definition.
    pub records: Vec<FunctionRecord>,
    pub issues: Vec<DocError>,
}

impl ScannedFile {
    pub fn record(&self, name: &str) -> Option<&FunctionRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

/// Mutable state threaded through the scan of one file.
struct ScanContext<'t> {
    tags: &'t Tags,
    state: State,
    records: Vec<FunctionRecord>,
    issues: Vec<DocError>,
    /// Enclosing functions as (indentation width, record index), innermost last.
    scopes: Vec<(usize, usize)>,
    /// Record whose docstring may start on the next statement line.
    awaiting_doc: Option<usize>,
    open: Option<OpenDoc>,
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

impl<'t> ScanContext<'t> {
    fn new(tags: &'t Tags) -> Self {
        Self {
            tags,
            state: State::Outside,
            records: Vec::new(),
            issues: Vec::new(),
            scopes: Vec::new(),
            awaiting_doc: None,
            open: None,
        }
    }

    fn close_scopes(&mut self, width: usize) {
        while matches!(self.scopes.last(), Some(&(w, _)) if w >= width) {
            self.scopes.pop();
        }
    }

    fn abandon_open_doc(&mut self) {
        if let Some(open) = self.open.take() {
            let function = self.records[open.owner].name.clone();
            warn!(function = %function, line = open.start_line + 1, "docstring never closed, leaving it untouched");
            self.issues.push(DocError::UnterminatedDocstring {
                function,
                line: open.start_line + 1,
            });
        }
        self.state = State::Outside;
    }

    fn step(&mut self, ldx: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if signature::is_definition(line) {
            self.on_definition(ldx, raw);
            return;
        }

        if self.state != State::Outside {
            self.on_doc_line(ldx, line);
            return;
        }

        if line.starts_with('#') {
            return;
        }

        if let Some(owner) = self.awaiting_doc.take() {
            if line.starts_with(DELIMITER) {
                self.on_open(ldx, raw, owner);
                return;
            }
        }

        if line.starts_with("class ") {
            self.close_scopes(indent_width(raw));
        } else if let Some(expr) = line.strip_prefix("return ") {
            self.on_return(raw, expr);
        }
    }

    fn on_definition(&mut self, ldx: usize, raw: &str) {
        self.abandon_open_doc();

        let name = signature::definition_name(raw).unwrap_or_default().to_string();
        let signature = match signature::parse_definition(raw, ldx) {
            Ok((sig, warnings)) => {
                for w in &warnings {
                    warn!("{}", w);
                }
                self.issues.extend(warnings);
                Some(sig)
            }
            Err(e) => {
                warn!("{}", e);
                self.issues.push(e);
                None
            }
        };

        // A later definition with the same name replaces the earlier one.
        if let Some(pos) = self.records.iter().position(|r| r.name == name) {
            let earlier = self.records.remove(pos);
            if earlier.range.is_some() {
                warn!(function = %name, line = ldx + 1, "redefinition leaves earlier docstring untouched");
                self.issues.push(DocError::Redefined {
                    function: name.clone(),
                    line: earlier.def_line + 1,
                    redefined_at: ldx + 1,
                });
            } else {
                debug!(function = %name, "redefinition replaces earlier record");
            }
            self.scopes.retain(|&(_, idx)| idx != pos);
            for scope in &mut self.scopes {
                if scope.1 > pos {
                    scope.1 -= 1;
                }
            }
        }

        self.records.push(FunctionRecord::new(name, ldx, signature));
        let idx = self.records.len() - 1;

        let width = indent_width(raw);
        self.close_scopes(width);
        self.scopes.push((width, idx));
        self.awaiting_doc = Some(idx);
    }

    fn on_open(&mut self, ldx: usize, raw: &str, owner: usize) {
        let line = raw.trim();
        let rest = &line[DELIMITER.len()..];
        let indent = raw[..indent_width(raw)].to_string();

        // `"""text"""` on one line has no tags to convert.
        if rest.trim_end().ends_with(DELIMITER) {
            debug!(function = %self.records[owner].name, "single-line docstring left as is");
            return;
        }

        self.state = State::Header;
        self.open = Some(OpenDoc {
            owner,
            start_line: ldx,
            indent,
            block: DocBlock::default(),
        });
        let rest = rest.trim();
        if !rest.is_empty() {
            self.on_content(rest);
        }
    }

    fn on_doc_line(&mut self, ldx: usize, line: &str) {
        if line.starts_with(DELIMITER) {
            self.on_close(ldx);
            return;
        }
        if let Some(text) = line.strip_suffix(DELIMITER) {
            let text = text.trim();
            if !text.is_empty() {
                self.on_content(text);
            }
            self.on_close(ldx);
            return;
        }
        self.on_content(line);
    }

    fn on_close(&mut self, ldx: usize) {
        self.state = State::Outside;
        if let Some(open) = self.open.take() {
            let record = &mut self.records[open.owner];
            record.doc = Some(open.block);
            record.indent = open.indent;
            record.range = Some(LineRange {
                start_line: open.start_line,
                end_line: ldx,
            });
        }
    }

    /// Handle a non-delimiter line inside an open docstring.
    fn on_content(&mut self, line: &str) {
        let Some(open) = self.open.as_mut() else {
            return;
        };

        if let Some(rest) = line.strip_prefix(self.tags.param.as_str()) {
            let (key, description) = split_tag(rest);
            let idx = open.block.params.start(key);
            if let Some(d) = description {
                open.block.params.push_line(idx, d);
            }
            self.state = State::InParam(idx);
            return;
        }

        if let Some(rest) = line.strip_prefix(self.tags.ret.as_str()) {
            let rest = strip_plural(rest).trim_start();
            let rest = rest.strip_prefix(':').unwrap_or(rest);
            let (key, description) = split_tag(rest);
            let idx = open.block.returns.start(key);
            if let Some(d) = description {
                open.block.returns.push_line(idx, d);
            }
            self.state = State::InReturn(idx);
            return;
        }

        match self.state {
            State::Header => open.block.header.push(line.to_string()),
            State::InParam(idx) => open.block.params.push_line(idx, line),
            State::InReturn(idx) => open.block.returns.push_line(idx, line),
            State::Outside => {}
        }
    }

    fn on_return(&mut self, raw: &str, expr: &str) {
        self.close_scopes(indent_width(raw));
        let Some(&(_, owner)) = self.scopes.last() else {
            return;
        };

        let expr = strip_parens(strip_comment(expr));
        let names: Vec<String> = split_top_level(expr, ',')
            .into_iter()
            .map(strip_parens)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        self.records[owner].returns = names;
    }

    fn finish(mut self) -> ScannedFile {
        self.abandon_open_doc();
        ScannedFile {
            records: self.records,
            issues: self.issues,
        }
    }
}

/// `:returns` is accepted wherever `:return` is.
fn strip_plural(rest: &str) -> &str {
    match rest.strip_prefix('s') {
        Some(r) if r.is_empty() || r.starts_with(':') || r.starts_with(char::is_whitespace) => r,
        _ => rest,
    }
}

/// Split the text after a tag into its key and optional inline description.
fn split_tag(rest: &str) -> (&str, Option<&str>) {
    let rest = rest.trim();
    match rest.split_once(':') {
        Some((key, description)) => {
            let description = description.trim();
            (
                key.trim(),
                if description.is_empty() {
                    None
                } else {
                    Some(description)
                },
            )
        }
        None => (rest, None),
    }
}

/// Scan file content, one record per function.
pub fn scan_lines<'a, I>(lines: I, tags: &Tags) -> ScannedFile
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ctx = ScanContext::new(tags);
    for (ldx, line) in lines.into_iter().enumerate() {
        ctx.step(ldx, line);
    }
    ctx.finish()
}

/// Convenience wrapper over [`scan_lines`] for whole-file content.
pub fn scan_str(content: &str, tags: &Tags) -> ScannedFile {
    scan_lines(content.lines(), tags)
}
