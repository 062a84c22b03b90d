use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ResolveError;
use crate::extractor::IMPORT_STATEMENT;
use crate::resolver::ResolvedImport;

/// Bounded range pragma: `pragma solidity >=A.B.C <D.E.F;`.
static PRAGMA_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pragma\s+solidity\s+>=\s*(\d+\.\d+\.\d+)\s+<\s*(\d+\.\d+\.\d+)\s*;")
        .expect("range pragma regex is valid")
});

/// Single-clause pragma with a comparison operator.
/// `>=` and `<=` must be listed before `>` and `<`.
static PRAGMA_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pragma\s+solidity\s+(\^|~|>=|<=|>|<)\s*(\d+\.\d+\.\d+)\s*;")
        .expect("single pragma regex is valid")
});

/// Rewrite every import statement whose quoted path matches a resolved
/// import, substituting the quoted portion with the canonical id. Matching
/// is by exact original-path-text equality across the whole document, so
/// repeated imports of the same path are all rewritten. Quotes, braces,
/// `from`, and the trailing semicolon (or its absence) stay byte-identical.
pub fn update_import_paths(code: &str, resolved: &[ResolvedImport]) -> String {
    if resolved.is_empty() {
        return code.to_string();
    }

    let replacements: HashMap<&str, &str> = resolved
        .iter()
        .map(|r| (r.original.as_str(), r.updated.as_str()))
        .collect();

    IMPORT_STATEMENT
        .replace_all(code, |caps: &Captures| {
            let whole = caps.get(0).expect("regex match has a whole span");
            let path = caps
                .get(2)
                .or_else(|| caps.get(3))
                .expect("import statement regex always captures a path group");

            match replacements.get(path.as_str()) {
                Some(updated) => {
                    let text = whole.as_str();
                    let start = path.start() - whole.start();
                    let end = path.end() - whole.start();
                    format!("{}{}{}", &text[..start], updated, &text[end..])
                }
                None => whole.as_str().to_string(),
            }
        })
        .into_owned()
}

/// Normalize the version pragma.
///
/// With a target version, the declaration becomes `pragma solidity >=<target>;`
/// (the bounded form keeps its two-clause shape, target as lower bound).
/// Without a target, a single-clause pragma keeps its declared version with
/// the operator normalized to `>=`; a bounded pragma is left unchanged.
///
/// Fails with [`ResolveError::PragmaNotFound`] when neither form is present;
/// the graph builder treats that as non-fatal.
pub fn update_pragma(code: &str, target: Option<&str>) -> Result<String, ResolveError> {
    if let Some(caps) = PRAGMA_RANGE.captures(code) {
        return Ok(match target {
            Some(version) => {
                let upper = caps
                    .get(2)
                    .expect("range pragma regex captures an upper bound");
                let replacement = format!("pragma solidity >={} <{};", version, upper.as_str());
                PRAGMA_RANGE.replace(code, replacement.as_str()).into_owned()
            }
            None => code.to_string(),
        });
    }

    if let Some(caps) = PRAGMA_SINGLE.captures(code) {
        let declared = caps
            .get(2)
            .expect("single pragma regex captures a version");
        let version = target.unwrap_or(declared.as_str());
        let replacement = format!("pragma solidity >={};", version);
        return Ok(PRAGMA_SINGLE
            .replace(code, replacement.as_str())
            .into_owned());
    }

    Err(ResolveError::PragmaNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract_imports;

    fn resolved(original: &str, absolute: &str) -> ResolvedImport {
        ResolvedImport {
            original: original.to_string(),
            absolute: absolute.to_string(),
            updated: absolute.to_string(),
        }
    }

    #[test]
    fn test_substitutes_quoted_path_only() {
        let code = "import { A } from \"./A.sol\";\ncontract Main {}\n";
        let out = update_import_paths(code, &[resolved("./A.sol", "/project/A.sol")]);
        assert_eq!(out, "import { A } from \"/project/A.sol\";\ncontract Main {}\n");
    }

    #[test]
    fn test_preserves_single_quotes_and_missing_semicolon() {
        let code = "import './A.sol'\n";
        let out = update_import_paths(code, &[resolved("./A.sol", "/project/A.sol")]);
        assert_eq!(out, "import '/project/A.sol'\n");
    }

    #[test]
    fn test_rewrites_every_occurrence_not_just_the_first() {
        let code = "import \"./A.sol\";\nimport \"./B.sol\";\nimport \"./A.sol\";\n";
        let out = update_import_paths(
            code,
            &[
                resolved("./A.sol", "/project/A.sol"),
                resolved("./B.sol", "/project/B.sol"),
            ],
        );
        assert_eq!(
            out,
            "import \"/project/A.sol\";\nimport \"/project/B.sol\";\nimport \"/project/A.sol\";\n"
        );
    }

    #[test]
    fn test_unresolved_statements_left_untouched() {
        let code = "import \"./A.sol\";\nimport \"./Other.sol\";\n";
        let out = update_import_paths(code, &[resolved("./A.sol", "/project/A.sol")]);
        assert_eq!(out, "import \"/project/A.sol\";\nimport \"./Other.sol\";\n");
    }

    #[test]
    fn test_substitution_round_trips_through_extraction() {
        let code = "import { A } from \"./A.sol\";\n";
        let out = update_import_paths(code, &[resolved("./A.sol", "/project/A.sol")]);
        let reextracted = extract_imports(&out).unwrap();
        assert_eq!(reextracted.len(), 1);
        assert_eq!(reextracted[0].path, "/project/A.sol");
    }

    #[test]
    fn test_caret_pragma_without_target_normalizes_operator() {
        let code = "pragma solidity ^0.8.0;\ncontract A {}\n";
        let out = update_pragma(code, None).unwrap();
        assert_eq!(out, "pragma solidity >=0.8.0;\ncontract A {}\n");
    }

    #[test]
    fn test_single_pragma_with_target() {
        let code = "pragma solidity ~0.7.6;\n";
        let out = update_pragma(code, Some("0.8.17")).unwrap();
        assert_eq!(out, "pragma solidity >=0.8.17;\n");
    }

    #[test]
    fn test_operator_variants() {
        for op in ["^", "~", ">", ">=", "<", "<="] {
            let code = format!("pragma solidity {}0.8.0;\n", op);
            let out = update_pragma(&code, None).unwrap();
            assert_eq!(out, "pragma solidity >=0.8.0;\n", "operator {}", op);
        }
    }

    #[test]
    fn test_bounded_pragma_without_target_unchanged() {
        let code = "pragma solidity >=0.8.0 <0.9.0;\ncontract A {}\n";
        let out = update_pragma(code, None).unwrap();
        assert_eq!(out, code);
    }

    #[test]
    fn test_bounded_pragma_with_target_keeps_upper_bound() {
        let code = "pragma solidity >=0.8.0 <0.9.0;\n";
        let out = update_pragma(code, Some("0.8.17")).unwrap();
        assert_eq!(out, "pragma solidity >=0.8.17 <0.9.0;\n");
    }

    #[test]
    fn test_missing_pragma_is_reported() {
        let code = "contract A {}\n";
        assert!(matches!(
            update_pragma(code, None),
            Err(ResolveError::PragmaNotFound)
        ));
    }
}
