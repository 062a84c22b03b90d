use std::sync::LazyLock;

use regex::Regex;

use crate::error::ResolveError;

/// Matches one import statement. Line-anchored so every line can
/// independently open an import; the symbol list between braces may span
/// lines. Group 1 is the full statement from the `import` keyword, groups
/// 2 and 3 are the double- and single-quoted path text.
///
/// Recognized forms:
/// - `import "path";` (semicolon optional, either quote style)
/// - `import { A, B } from "path";`
/// - `import * as Alias from "path";`
/// - `import Alias from "path";`
pub(crate) static IMPORT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*(import\s+(?:(?:\{[^}]*\}|\*\s+as\s+[A-Za-z_$][A-Za-z0-9_$]*|[A-Za-z_$][A-Za-z0-9_$]*)\s+from\s+)?(?:"([^"\n]*)"|'([^'\n]*)')[ \t]*;?)"#,
    )
    .expect("import statement regex is valid")
});

/// Matches a line that opens with the `import` keyword, recognized form or not.
static IMPORT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*import\b").expect("import keyword regex is valid"));

/// A raw import declaration as it appears in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
    /// Exact text between the quote characters.
    pub path: String,
    /// Full text span of the import statement, from the `import` keyword.
    pub statement: String,
}

/// Scan source text for import declarations, in appearance order with
/// duplicates preserved.
///
/// An `import` keyword that opens a statement without a quoted path (an
/// empty quoted path included) fails the whole file with
/// [`ResolveError::ImportSyntax`].
pub fn extract_imports(code: &str) -> Result<Vec<RawImport>, ResolveError> {
    let mut imports = Vec::new();
    let mut matched_spans: Vec<(usize, usize)> = Vec::new();

    for caps in IMPORT_STATEMENT.captures_iter(code) {
        let whole = caps.get(0).expect("regex match has a whole span");
        let statement = caps.get(1).expect("group 1 always participates");
        let path = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or("");

        if path.is_empty() {
            return Err(ResolveError::ImportSyntax {
                statement: statement.as_str().to_string(),
            });
        }

        matched_spans.push((whole.start(), whole.end()));
        imports.push(RawImport {
            path: path.to_string(),
            statement: statement.as_str().to_string(),
        });
    }

    // An import keyword outside every recognized statement opened without a
    // resolvable quoted path.
    for keyword in IMPORT_KEYWORD.find_iter(code) {
        let covered = matched_spans
            .iter()
            .any(|&(start, end)| keyword.start() >= start && keyword.start() < end);
        if !covered {
            let line = code[keyword.start()..]
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
            return Err(ResolveError::ImportSyntax { statement: line });
        }
    }

    Ok(imports)
}
