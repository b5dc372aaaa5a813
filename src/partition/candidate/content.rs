//! Diff-content candidates: domain terms and declared symbols.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::{CandidateName, CandidateSet, SymbolKind};
use crate::partition::extract::ChangedFile;

/// Function-style declarations (`fn`, `def`, `func`, `function`), optionally after
/// visibility/modifier keywords, at the start of a diff line.
static FUNCTION_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[+\- ]?[ \t]*(?:(?:pub(?:\([a-z]+\))?|export|default|async|static|public|private|protected|unsafe|const)[ \t]+)*(?:fn|def|func|function)[ \t]+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("Invalid regex")
});

/// Type/class-style declarations.
static TYPE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[+\- ]?[ \t]*(?:(?:pub(?:\([a-z]+\))?|export|default|abstract|public|private|sealed|data)[ \t]+)*(?:struct|enum|trait|class|interface|type)[ \t]+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("Invalid regex")
});

/// Generate content candidates for every file, in file order.
///
/// Per file: vocabulary terms found in the diff (vocabulary order), then
/// declared symbols in order of first appearance.
pub fn generate(files: &[ChangedFile], domain_terms: &[String]) -> CandidateSet {
    let mut set = CandidateSet::new();

    for (idx, file) in files.iter().enumerate() {
        if file.diff_text.is_empty() {
            continue;
        }

        let lowered = file.diff_text.to_lowercase();
        for term in domain_terms {
            if lowered.contains(term.as_str()) {
                set.add(CandidateName::term(term.as_str()), idx);
            }
        }

        for (kind, symbol) in declared_symbols(&file.diff_text) {
            set.add(CandidateName::symbol(kind, symbol), idx);
        }
    }

    set
}

/// Declared symbol names in `text`, ordered by position.
pub fn declared_symbols(text: &str) -> Vec<(SymbolKind, &str)> {
    let mut found: Vec<(usize, SymbolKind, &str)> = Vec::new();

    for (kind, re) in [
        (SymbolKind::Function, &*FUNCTION_DECL),
        (SymbolKind::Type, &*TYPE_DECL),
    ] {
        for caps in re.captures_iter(text) {
            if let Some(name) = caps.get(1) {
                found.push((name.start(), kind, name.as_str()));
            }
        }
    }

    found.sort_by_key(|(start, _, _)| *start);
    found.into_iter().map(|(_, kind, name)| (kind, name)).collect()
}
