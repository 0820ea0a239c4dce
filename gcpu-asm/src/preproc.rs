use crate::error::AsmError;

/// A cleaned source line along with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

fn strip_comment(line: &str) -> &str {
    match line.find(|c| c == ';' || c == '@') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

///
/// ## `preprocess` Function
///
/// Strips comments and blank lines, folds a line holding only `label:` into
/// the line that follows it and lowercases everything.
///
/// # Errors
///
///  - `DanglingLabel` if a bare label is the last line of the source.
///
pub fn preprocess(source: &str) -> Result<Vec<SourceLine>, AsmError> {
    let mut out: Vec<SourceLine> = Vec::new();
    let mut pending: Option<SourceLine> = None;

    for (idx, raw) in source.lines().enumerate() {
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }

        let text = match pending.take() {
            Some(label) => format!("{} {}", label.text, text),
            None => text.to_string(),
        };
        let line = SourceLine {
            number: idx + 1,
            text: text.to_lowercase(),
        };

        if line.text.ends_with(':') {
            pending = Some(line);
        } else {
            out.push(line);
        }
    }

    match pending {
        Some(label) => Err(AsmError::DanglingLabel {
            line: label.number,
            text: label.text,
        }),
        None => Ok(out),
    }
}
