//! Builds NumPy-style docstrings from scanned records.

use tracing::{debug, warn};

use super::scanner::{ScannedFile, DELIMITER};
use super::{ConversionFinding, DocBlock, FunctionRecord, LineRange, Signature};

const PARAMETERS: &str = "Parameters";
const RETURNS: &str = "Returns";
/// Extra indentation for description lines under an entry.
const SUB_INDENT: &str = "    ";

/// A synthesized docstring and the original lines it replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub function: String,
    pub range: LineRange,
    pub text: String,
}

/// Replacements and findings for one file.
#[derive(Debug, Clone, Default)]
pub struct Synthesized {
    /// Sorted by `range.start_line`.
    pub replacements: Vec<Replacement>,
    pub findings: Vec<ConversionFinding>,
}

struct BlockWriter<'a> {
    indent: &'a str,
    out: String,
}

impl<'a> BlockWriter<'a> {
    fn line(&mut self, text: &str) {
        self.out.push_str(self.indent);
        self.out.push_str(text);
        self.finish_line();
    }

    fn sub_line(&mut self, text: &str) {
        self.out.push_str(self.indent);
        self.out.push_str(SUB_INDENT);
        self.out.push_str(text);
        self.finish_line();
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn section(&mut self, title: &str) {
        self.blank();
        self.line(title);
        self.line(&"-".repeat(title.len()));
    }

    fn finish_line(&mut self) {
        let kept = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(kept);
        self.out.push('\n');
    }
}

fn write_parameters(w: &mut BlockWriter<'_>, doc: &DocBlock, sig: &Signature) {
    if doc.params.is_empty() {
        return;
    }
    w.section(PARAMETERS);
    for (name, lines) in doc.params.iter() {
        let spec = sig.param(name);
        match spec.and_then(|p| p.declared_type.as_deref()) {
            Some(ty) => w.line(&format!("{} : {}", name, ty)),
            None => w.line(name),
        }
        for l in lines {
            w.sub_line(l);
        }
        if let Some(default) = spec.and_then(|p| p.default_value.as_deref()) {
            w.sub_line(&format!("Default: {}", default));
        }
    }
}

/// Write the Returns section; return values that have no documented entry are collected.
fn write_returns(
    w: &mut BlockWriter<'_>,
    doc: &DocBlock,
    sig: &Signature,
    returns: &[String],
) -> Vec<String> {
    let mut unmapped = Vec::new();
    if returns.is_empty() {
        return unmapped;
    }
    w.section(RETURNS);

    let types = &sig.output_types;
    if returns.len() != types.len() {
        if let [only] = types.as_slice() {
            w.line(&format!("Number of items in {} : {}", only, returns.len()));
        }
        for (key, lines) in doc.returns.iter() {
            w.line(key);
            for l in lines {
                w.sub_line(l);
            }
        }
        return unmapped;
    }

    for (name, ty) in returns.iter().zip(types) {
        match doc.returns.get(name) {
            Some(lines) => {
                w.line(&format!("{} : {}", name, ty));
                for l in lines {
                    w.sub_line(l);
                }
            }
            None => unmapped.push(name.clone()),
        }
    }
    unmapped
}

/// Build the replacement docstring for one record.
///
/// Returns `None` when the record has no valid signature or no closed docstring.
pub fn synthesize(record: &FunctionRecord) -> Option<(String, Option<ConversionFinding>)> {
    let (Some(sig), Some(doc)) = (record.signature.as_ref(), record.doc.as_ref()) else {
        return None;
    };

    let mut w = BlockWriter {
        indent: &record.indent,
        out: String::new(),
    };
    w.line(DELIMITER);
    for h in &doc.header {
        w.line(h);
    }
    write_parameters(&mut w, doc, sig);

    if record.returns.is_empty() && !doc.returns.is_empty() {
        warn!(
            function = %record.name,
            "documented return has no matching return statement, dropping it"
        );
    }
    let unmapped = write_returns(&mut w, doc, sig, &record.returns);
    w.line(DELIMITER);

    let finding = if unmapped.is_empty() {
        None
    } else {
        Some(ConversionFinding {
            function: record.name.clone(),
            unmapped,
        })
    };
    Some((w.out, finding))
}

/// Build replacements for every convertible function of a scanned file.
pub fn synthesize_file(scanned: &ScannedFile) -> Synthesized {
    let mut result = Synthesized::default();

    for record in &scanned.records {
        if !record.is_convertible() {
            debug!(function = %record.name, "nothing to convert, left as is");
            continue;
        }
        let (Some(range), Some((text, finding))) = (record.range, synthesize(record)) else {
            continue;
        };
        result.findings.extend(finding);
        result.replacements.push(Replacement {
            function: record.name.clone(),
            range,
            text,
        });
    }

    result
        .replacements
        .sort_by_key(|r| r.range.start_line);
    result
}
