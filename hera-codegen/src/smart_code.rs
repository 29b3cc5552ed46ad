//! Smart code grammar
//!
//! Every business object in a pack carries a smart code of the form
//! `HERA.<DOMAIN>.<SEGMENT>….v<N>`: an upper-case domain of 3–15 characters,
//! 3–8 further segments of 2–30 upper-case/digit/underscore characters, and
//! a lower-case `v` version suffix.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::pack::AppPack;
use crate::validate::{Severity, ValidationError};

/// The smart code grammar, as a regular expression source.
pub const SMART_CODE_PATTERN: &str = r"^HERA\.[A-Z0-9]{3,15}(?:\.[A-Z0-9_]{2,30}){3,8}\.v[0-9]+$";

static SMART_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(SMART_CODE_PATTERN).expect("smart code pattern is a valid regex"));

/// Returns `true` if `code` matches the smart code grammar.
pub fn is_valid_smart_code(code: &str) -> bool {
    SMART_CODE_RE.is_match(code)
}

// ── Pack walk ────────────────────────────────────────────────────────────────

/// A smart code found in a pack, with the path it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartCodeRef<'a> {
    /// Pack path, e.g. `entities[0].fields[1].smart_code`.
    pub location: String,
    pub code: &'a str,
}

/// Every smart code in the pack, in declaration order.
pub fn collect_smart_codes(pack: &AppPack) -> Vec<SmartCodeRef<'_>> {
    let mut out = vec![SmartCodeRef {
        location: "app.smart_code".to_string(),
        code: &pack.app.smart_code,
    }];

    for (eidx, entity) in pack.entities.iter().enumerate() {
        out.push(SmartCodeRef {
            location: format!("entities[{eidx}].smart_code"),
            code: &entity.smart_code,
        });
        for (fidx, field) in entity.fields.iter().enumerate() {
            out.push(SmartCodeRef {
                location: format!("entities[{eidx}].fields[{fidx}].smart_code"),
                code: &field.smart_code,
            });
        }
        for (ridx, rel) in entity.relationships.iter().enumerate() {
            if let Some(code) = &rel.smart_code {
                out.push(SmartCodeRef {
                    location: format!("entities[{eidx}].relationships[{ridx}].smart_code"),
                    code,
                });
            }
        }
    }

    for (tidx, txn) in pack.transactions.iter().enumerate() {
        out.push(SmartCodeRef {
            location: format!("transactions[{tidx}].smart_code"),
            code: &txn.smart_code,
        });
        for (lidx, line) in txn.lines.iter().enumerate() {
            out.push(SmartCodeRef {
                location: format!("transactions[{tidx}].lines[{lidx}].smart_code"),
                code: &line.smart_code,
            });
        }
    }

    out
}

/// Check every smart code in the pack against the grammar.
///
/// Returns one error per failing code; an empty `Vec` means all codes are
/// well-formed. Never stops at the first failure.
pub fn validate_smart_codes(pack: &AppPack) -> Vec<ValidationError> {
    collect_smart_codes(pack)
        .into_iter()
        .filter(|r| !is_valid_smart_code(r.code))
        .map(|r| ValidationError {
            message: format!(
                "invalid smart code '{}' (expected HERA.<DOMAIN>.<SEGMENT>...v<N>)",
                r.code
            ),
            location: r.location,
            severity: Severity::Error,
        })
        .collect()
}

/// Smart codes used more than once, with every location that uses them.
///
/// Ordered by first occurrence.
pub fn find_duplicate_smart_codes(pack: &AppPack) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for r in collect_smart_codes(pack) {
        match groups.iter_mut().find(|(code, _)| code == r.code) {
            Some((_, locations)) => locations.push(r.location),
            None => groups.push((r.code.to_string(), vec![r.location])),
        }
    }
    groups.retain(|(_, locations)| locations.len() > 1);
    groups
}

// ── Tests ────────────────────────────────────────────────────────────────────
