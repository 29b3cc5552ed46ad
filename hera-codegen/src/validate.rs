//! App pack validator
//!
//! Checks an [`AppPack`] for structural and semantic errors before any file
//! is generated. Smart code grammar failures come from
//! [`validate_smart_codes`](crate::smart_code::validate_smart_codes); this
//! module adds the cross-object checks on top.

use crate::middleware::PERMISSIONS;
use crate::naming::to_kebab_case;
use crate::pack::{AppPack, LineType, Side};
use crate::smart_code::{find_duplicate_smart_codes, validate_smart_codes};

/// Field name the generated forms use for the entity's own name.
pub const RESERVED_FIELD: &str = "entity_name";

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Human-readable description of the problem.
    pub message: String,
    /// Location in the pack that caused the error (e.g. `entities[0].fields[1]`).
    pub location: String,
    /// Whether this blocks generation (`Error`) or is advisory (`Warning`).
    pub severity: Severity,
}

/// Severity of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks generation.
    Error,
    /// Advisory: output is still generated.
    Warning,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{}] {}: {}", tag, self.location, self.message)
    }
}

/// Validate an [`AppPack`] and return all problems found.
///
/// An empty `Vec` means the pack is clean. Any entry with
/// [`Severity::Error`] blocks generation.
pub fn validate(pack: &AppPack) -> Vec<ValidationError> {
    let mut errors = validate_smart_codes(pack);

    if !pack.app.id.is_empty() && to_kebab_case(&pack.app.id).is_empty() {
        errors.push(ValidationError {
            message: format!(
                "app id '{}' has no letters or digits to build a route from",
                pack.app.id
            ),
            location: "app.id".to_string(),
            severity: Severity::Error,
        });
    }

    validate_entities(pack, &mut errors);
    validate_transactions(pack, &mut errors);
    validate_roles(pack, &mut errors);

    for (code, locations) in find_duplicate_smart_codes(pack) {
        errors.push(ValidationError {
            message: format!(
                "smart code '{code}' is also used at {}",
                locations[1..].join(", ")
            ),
            location: locations[0].clone(),
            severity: Severity::Warning,
        });
    }

    errors
}

/// Returns `true` if `validate()` produces no `Error`-severity issues.
pub fn is_valid(pack: &AppPack) -> bool {
    !validate(pack).iter().any(|e| e.severity == Severity::Error)
}

/// Number of `Error`-severity entries.
pub fn error_count(errors: &[ValidationError]) -> usize {
    errors
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .count()
}

// ── Internal validators ────────────────────────────────────────────────────────

/// Entity and transaction types become route and directory names; two
/// types must not share one, and every type must produce one.
fn check_route_slug<'a>(
    key: &str,
    value: &'a str,
    location: String,
    seen: &mut Vec<(String, &'a str)>,
    errors: &mut Vec<ValidationError>,
) {
    let slug = to_kebab_case(value);
    if slug.is_empty() {
        errors.push(ValidationError {
            message: format!("{key} '{value}' has no letters or digits to build a route from"),
            location,
            severity: Severity::Error,
        });
        return;
    }
    let first = seen.iter().find(|(s, _)| *s == slug).map(|(_, t)| *t);
    match first {
        Some(first) => errors.push(ValidationError {
            message: format!("{key} '{value}' maps to route '{slug}', already used by '{first}'"),
            location,
            severity: Severity::Error,
        }),
        None => seen.push((slug, value)),
    }
}

fn validate_entities(pack: &AppPack, errors: &mut Vec<ValidationError>) {
    let mut seen_types: Vec<&str> = Vec::new();
    let mut seen_slugs: Vec<(String, &str)> = Vec::new();

    for (idx, entity) in pack.entities.iter().enumerate() {
        let loc = format!("entities[{idx}]");

        if entity.entity_type.is_empty() {
            errors.push(ValidationError {
                message: "entity_type must not be empty".to_string(),
                location: format!("{loc}.entity_type"),
                severity: Severity::Error,
            });
            continue;
        }

        if seen_types.contains(&entity.entity_type.as_str()) {
            errors.push(ValidationError {
                message: format!("duplicate entity_type '{}'", entity.entity_type),
                location: format!("{loc}.entity_type"),
                severity: Severity::Error,
            });
        } else {
            seen_types.push(&entity.entity_type);
            check_route_slug(
                "entity_type",
                &entity.entity_type,
                format!("{loc}.entity_type"),
                &mut seen_slugs,
                errors,
            );
        }

        if entity.fields.is_empty() {
            errors.push(ValidationError {
                message: format!(
                    "entity '{}' has no fields; only entity_name will be captured",
                    entity.entity_type
                ),
                location: format!("{loc}.fields"),
                severity: Severity::Warning,
            });
        }

        let mut seen_fields: Vec<&str> = Vec::new();
        for (fidx, field) in entity.fields.iter().enumerate() {
            if field.name.is_empty() {
                errors.push(ValidationError {
                    message: "field name must not be empty".to_string(),
                    location: format!("{loc}.fields[{fidx}]"),
                    severity: Severity::Error,
                });
                continue;
            }
            if field.name == RESERVED_FIELD {
                errors.push(ValidationError {
                    message: format!(
                        "field name '{RESERVED_FIELD}' is reserved for the entity name"
                    ),
                    location: format!("{loc}.fields[{fidx}].name"),
                    severity: Severity::Error,
                });
                continue;
            }
            if seen_fields.contains(&field.name.as_str()) {
                errors.push(ValidationError {
                    message: format!("duplicate field name '{}'", field.name),
                    location: format!("{loc}.fields[{fidx}].name"),
                    severity: Severity::Error,
                });
            } else {
                seen_fields.push(&field.name);
            }
        }

        for (ridx, rel) in entity.relationships.iter().enumerate() {
            if pack.entity(&rel.target_entity).is_none() {
                errors.push(ValidationError {
                    message: format!(
                        "relationship target '{}' is not declared in this pack",
                        rel.target_entity
                    ),
                    location: format!("{loc}.relationships[{ridx}].target_entity"),
                    severity: Severity::Warning,
                });
            }
        }
    }
}

fn validate_transactions(pack: &AppPack, errors: &mut Vec<ValidationError>) {
    let mut seen_types: Vec<&str> = Vec::new();
    let mut seen_slugs: Vec<(String, &str)> = Vec::new();

    for (idx, txn) in pack.transactions.iter().enumerate() {
        let loc = format!("transactions[{idx}]");

        if txn.transaction_type.is_empty() {
            errors.push(ValidationError {
                message: "transaction_type must not be empty".to_string(),
                location: format!("{loc}.transaction_type"),
                severity: Severity::Error,
            });
            continue;
        }

        if seen_types.contains(&txn.transaction_type.as_str()) {
            errors.push(ValidationError {
                message: format!("duplicate transaction_type '{}'", txn.transaction_type),
                location: format!("{loc}.transaction_type"),
                severity: Severity::Error,
            });
        } else {
            seen_types.push(&txn.transaction_type);
            check_route_slug(
                "transaction_type",
                &txn.transaction_type,
                format!("{loc}.transaction_type"),
                &mut seen_slugs,
                errors,
            );
        }

        if txn.lines.is_empty() {
            errors.push(ValidationError {
                message: format!("transaction '{}' has no lines", txn.transaction_type),
                location: format!("{loc}.lines"),
                severity: Severity::Error,
            });
        }

        let mut seen_lines: Vec<&str> = Vec::new();
        for (lidx, line) in txn.lines.iter().enumerate() {
            if line.name.trim().is_empty() {
                errors.push(ValidationError {
                    message: "line name must not be empty".to_string(),
                    location: format!("{loc}.lines[{lidx}].name"),
                    severity: Severity::Error,
                });
            } else if seen_lines.contains(&line.name.as_str()) {
                errors.push(ValidationError {
                    message: format!("duplicate line name '{}'", line.name),
                    location: format!("{loc}.lines[{lidx}].name"),
                    severity: Severity::Error,
                });
            } else {
                seen_lines.push(&line.name);
            }
            if line.line_type == LineType::Gl && line.side.is_none() {
                errors.push(ValidationError {
                    message: format!("GL line '{}' must declare side DR or CR", line.name),
                    location: format!("{loc}.lines[{lidx}].side"),
                    severity: Severity::Error,
                });
            }
        }

        if txn.has_gl_lines() {
            for side in [Side::Dr, Side::Cr] {
                if txn.gl_lines(side).next().is_none() {
                    errors.push(ValidationError {
                        message: format!(
                            "transaction '{}' has no {} GL line and can never balance",
                            txn.transaction_type,
                            side.as_str()
                        ),
                        location: format!("{loc}.lines"),
                        severity: Severity::Warning,
                    });
                }
            }
        }
    }
}

fn validate_roles(pack: &AppPack, errors: &mut Vec<ValidationError>) {
    for (role, perms) in &pack.deployment.roles {
        for perm in perms {
            let known = perm == "*"
                || PERMISSIONS.contains(&perm.as_str())
                || perm.strip_suffix(":*").is_some_and(|resource| {
                    PERMISSIONS
                        .iter()
                        .any(|p| p.split_once(':').is_some_and(|(r, _)| r == resource))
                });
            if !known {
                errors.push(ValidationError {
                    message: format!("role '{role}' grants unknown permission '{perm}'"),
                    location: format!("deployment.roles.{role}"),
                    severity: Severity::Warning,
                });
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
