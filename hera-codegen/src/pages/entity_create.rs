//! Entity create/edit page: a sectioned form driven by `fields[]`.
//!
//! Required fields go into "Basic Information" next to the entity name,
//! optional fields into "Additional Details". When the page is opened with
//! `?id=<entity id>` it loads the entity and submits a `PUT` instead of a
//! `POST`.

use crate::context::{EntityRoute, GenerationContext};
use crate::lib_files::{CLIENT_MODULE, SMART_CODES_MODULE};
use crate::pack::{FieldDef, FieldType};
use crate::pages::field_label;
use crate::source::{js_string, jsx_text, FileKind, GeneratedFile, SourceBuilder};

pub fn generate_entity_create_page(
    route: &EntityRoute<'_>,
    ctx: &GenerationContext<'_>,
) -> GeneratedFile {
    let entity = route.def;
    let name = jsx_text(&entity.entity_name);
    let (required, optional): (Vec<&FieldDef>, Vec<&FieldDef>) =
        entity.fields.iter().partition(|f| f.required);

    let mut b = SourceBuilder::with_header(&ctx.source_note());
    b.line("'use client'");
    b.blank();
    b.import(&["Suspense", "useEffect", "useState", "type FormEvent"], "react");
    b.line("import Link from 'next/link'");
    b.import(&["useRouter", "useSearchParams"], "next/navigation");
    b.import(&["ArrowLeft", "Save"], "lucide-react");
    b.import(
        &["heraFetch", "type DynamicFieldInput", "type HeraEntity"],
        &ctx.lib_import(CLIENT_MODULE),
    );
    b.import(&["ENTITY_SMART_CODES"], &ctx.lib_import(SMART_CODES_MODULE));
    b.blank();

    b.line(format!(
        "const ENTITY_TYPE = {}",
        js_string(&entity.entity_type)
    ));
    b.line("const SMART_CODES = ENTITY_SMART_CODES[ENTITY_TYPE]");
    b.line(format!("const LIST_ROUTE = {}", js_string(&route.list_route)));
    b.blank();

    emit_form_state(&mut b, &entity.fields);
    b.blank();
    emit_to_dynamic_fields(&mut b, &entity.fields);
    b.blank();
    emit_from_entity(&mut b, &entity.fields);
    b.blank();
    emit_validate(&mut b, &entity.entity_name, &entity.fields);
    b.blank();

    b.block(format!("function {}Form() {{", route.component), "}", |b| {
        b.line("const router = useRouter()");
        b.line("const editId = useSearchParams().get('id')");
        b.line("const [form, setForm] = useState<FormState>(EMPTY_FORM)");
        b.line("const [saving, setSaving] = useState(false)");
        b.line("const [error, setError] = useState<string | null>(null)");
        b.blank();
        b.block("useEffect(() => {", "}, [editId])", |b| {
            b.line("if (!editId) return");
            b.line("heraFetch<{ item: HeraEntity }>(`entities?entity_type=${ENTITY_TYPE}&id=${encodeURIComponent(editId)}`)");
            b.indented(|b| {
                b.line(".then(({ item }) => setForm(fromEntity(item)))");
                b.line(".catch((err) => setError(err instanceof Error ? err.message : String(err)))");
            });
        });
        b.blank();
        b.block(
            "function update<K extends keyof FormState>(key: K, value: FormState[K]) {",
            "}",
            |b| {
                b.line("setForm((prev) => ({ ...prev, [key]: value }))");
            },
        );
        b.blank();
        b.block(
            "async function handleSubmit(event: FormEvent<HTMLFormElement>) {",
            "}",
            |b| {
                b.line("event.preventDefault()");
                b.line("const problem = validate(form)");
                b.block("if (problem) {", "}", |b| {
                    b.line("setError(problem)");
                    b.line("return");
                });
                b.line("setSaving(true)");
                b.line("setError(null)");
                b.block("try {", "}", |b| {
                    b.block("await heraFetch('entities', {", "})", |b| {
                        b.line("method: editId ? 'PUT' : 'POST',");
                        b.block("body: JSON.stringify({", "}),", |b| {
                            b.lines([
                                "id: editId ?? undefined,",
                                "entity_type: ENTITY_TYPE,",
                                "entity_name: form.entity_name.trim(),",
                                "smart_code: SMART_CODES.entity,",
                                "dynamic_fields: toDynamicFields(form),",
                            ]);
                        });
                    });
                    b.line("router.push(LIST_ROUTE)");
                });
                b.block("catch (err) {", "}", |b| {
                    b.line("setError(err instanceof Error ? err.message : String(err))");
                });
                b.block("finally {", "}", |b| {
                    b.line("setSaving(false)");
                });
            },
        );
        b.blank();
        b.block("return (", ")", |b| {
            b.block(
                r#"<form onSubmit={handleSubmit} className="max-w-3xl space-y-8 p-6">"#,
                "</form>",
                |b| {
                    b.block(r#"<div className="flex items-center gap-3">"#, "</div>", |b| {
                        b.block(r#"<Link href={LIST_ROUTE} aria-label="Back">"#, "</Link>", |b| {
                            b.line(r#"<ArrowLeft className="h-5 w-5" />"#);
                        });
                        b.line(format!(
                            r#"<h1 className="text-2xl font-semibold">{{editId ? 'Edit' : 'New'}} {name}</h1>"#
                        ));
                    });

                    b.block(r#"<section className="space-y-4 rounded-lg border p-4">"#, "</section>", |b| {
                        b.line(r#"<h2 className="text-lg font-medium">Basic Information</h2>"#);
                        emit_name_input(b, &name);
                        for field in &required {
                            emit_field_input(b, field);
                        }
                    });

                    if !optional.is_empty() {
                        b.block(r#"<section className="space-y-4 rounded-lg border p-4">"#, "</section>", |b| {
                            b.line(r#"<h2 className="text-lg font-medium">Additional Details</h2>"#);
                            for field in &optional {
                                emit_field_input(b, field);
                            }
                        });
                    }

                    b.line(r#"{error && <p role="alert" className="text-sm text-red-600">{error}</p>}"#);
                    b.block(
                        r#"<button type="submit" disabled={saving} className="inline-flex items-center gap-2 rounded-md bg-primary px-4 py-2 text-sm text-primary-foreground disabled:opacity-50">"#,
                        "</button>",
                        |b| {
                            b.line(format!(
                                r#"<Save className="h-4 w-4" /> {{saving ? 'Saving…' : editId ? {} : {}}}"#,
                                js_string(&format!("Update {}", entity.entity_name)),
                                js_string(&format!("Create {}", entity.entity_name)),
                            ));
                        },
                    );
                },
            );
        });
    });
    b.blank();

    b.block(
        format!("export default function {}CreatePage() {{", route.component),
        "}",
        |b| {
            b.block("return (", ")", |b| {
                b.block(r#"<Suspense fallback={<div className="p-6">Loading…</div>}>"#, "</Suspense>", |b| {
                    b.line(format!("<{}Form />", route.component));
                });
            });
        },
    );

    GeneratedFile::new(ctx.entity_create_page_path(route), FileKind::Page, b.finish())
}

// ── Form model ───────────────────────────────────────────────────────────────

/// Type of the form-state slot for a field. Numbers are held as the raw
/// input string until submit.
fn form_slot_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text | FieldType::Number => "string",
        FieldType::Boolean => "boolean",
    }
}

fn form_slot_default(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text | FieldType::Number => "''",
        FieldType::Boolean => "false",
    }
}

fn emit_form_state(b: &mut SourceBuilder, fields: &[FieldDef]) {
    b.block("interface FormState {", "}", |b| {
        b.line("entity_name: string");
        for field in fields {
            b.line(format!(
                "{}: {}",
                js_string(&field.name),
                form_slot_type(field.field_type)
            ));
        }
    });
    b.blank();
    b.block("const EMPTY_FORM: FormState = {", "}", |b| {
        b.line("entity_name: '',");
        for field in fields {
            b.line(format!(
                "{}: {},",
                js_string(&field.name),
                form_slot_default(field.field_type)
            ));
        }
    });
}

fn emit_to_dynamic_fields(b: &mut SourceBuilder, fields: &[FieldDef]) {
    b.block(
        "function toDynamicFields(form: FormState): DynamicFieldInput[] {",
        "}",
        |b| {
            b.block("return [", "]", |b| {
                for field in fields {
                    let key = js_string(&field.name);
                    let value = match field.field_type {
                        FieldType::Text => format!("form[{key}].trim() || null"),
                        FieldType::Number => {
                            format!("form[{key}] === '' ? null : Number(form[{key}])")
                        }
                        FieldType::Boolean => format!("form[{key}]"),
                    };
                    b.line(format!(
                        "{{ field_name: {key}, field_type: {}, field_value: {value}, smart_code: SMART_CODES.fields[{key}] }},",
                        js_string(field.field_type.as_str()),
                    ));
                }
            });
        },
    );
}

fn emit_from_entity(b: &mut SourceBuilder, fields: &[FieldDef]) {
    b.block("function fromEntity(entity: HeraEntity): FormState {", "}", |b| {
        b.line("const values = entity.dynamic_fields ?? {}");
        b.block("return {", "}", |b| {
            b.line("entity_name: entity.entity_name,");
            for field in fields {
                let key = js_string(&field.name);
                let value = match field.field_type {
                    FieldType::Text | FieldType::Number => {
                        format!("values[{key}] == null ? '' : String(values[{key}])")
                    }
                    FieldType::Boolean => format!("Boolean(values[{key}])"),
                };
                b.line(format!("{key}: {value},"));
            }
        });
    });
}

fn emit_validate(b: &mut SourceBuilder, entity_name: &str, fields: &[FieldDef]) {
    b.block("function validate(form: FormState): string | null {", "}", |b| {
        b.line(format!(
            "if (!form.entity_name.trim()) return {}",
            js_string(&format!("{entity_name} name is required"))
        ));
        for field in fields {
            let key = js_string(&field.name);
            let label = field_label(field);
            match field.field_type {
                FieldType::Text => {
                    if field.required {
                        b.line(format!(
                            "if (!form[{key}].trim()) return {}",
                            js_string(&format!("{label} is required"))
                        ));
                    }
                }
                FieldType::Number => {
                    if field.required {
                        b.line(format!(
                            "if (form[{key}] === '') return {}",
                            js_string(&format!("{label} is required"))
                        ));
                    }
                    b.line(format!(
                        "if (form[{key}] !== '' && Number.isNaN(Number(form[{key}]))) return {}",
                        js_string(&format!("{label} must be a number"))
                    ));
                }
                // A checkbox always has a value.
                FieldType::Boolean => {}
            }
        }
        b.line("return null");
    });
}

// ── Inputs ───────────────────────────────────────────────────────────────────

fn emit_name_input(b: &mut SourceBuilder, name: &str) {
    b.block(r#"<label className="block space-y-1">"#, "</label>", |b| {
        b.line(format!(r#"<span className="text-sm font-medium">{name} Name *</span>"#));
        b.line("<input");
        b.indented(|b| {
            b.line(r#"type="text""#);
            b.line("required");
            b.line("value={form.entity_name}");
            b.line("onChange={(e) => update('entity_name', e.target.value)}");
            b.line(r#"className="w-full rounded-md border px-3 py-2 text-sm""#);
        });
        b.line("/>");
    });
}

fn emit_field_input(b: &mut SourceBuilder, field: &FieldDef) {
    let key = js_string(&field.name);
    let marker = if field.required { " *" } else { "" };
    let label = format!("{}{marker}", jsx_text(&field_label(field)));

    match field.field_type {
        FieldType::Boolean => {
            b.block(r#"<label className="flex items-center gap-2">"#, "</label>", |b| {
                b.line("<input");
                b.indented(|b| {
                    b.line(r#"type="checkbox""#);
                    b.line(format!("checked={{form[{key}]}}"));
                    b.line(format!("onChange={{(e) => update({key}, e.target.checked)}}"));
                });
                b.line("/>");
                b.line(format!(r#"<span className="text-sm font-medium">{label}</span>"#));
            });
        }
        FieldType::Text | FieldType::Number => {
            b.block(r#"<label className="block space-y-1">"#, "</label>", |b| {
                b.line(format!(r#"<span className="text-sm font-medium">{label}</span>"#));
                b.line("<input");
                b.indented(|b| {
                    if field.field_type == FieldType::Number {
                        b.line(r#"type="number""#);
                        b.line(r#"step="any""#);
                        b.line(r#"inputMode="decimal""#);
                    } else {
                        b.line(r#"type="text""#);
                    }
                    if field.required {
                        b.line("required");
                    }
                    b.line(format!("value={{form[{key}]}}"));
                    b.line(format!("onChange={{(e) => update({key}, e.target.value)}}"));
                    b.line(r#"className="w-full rounded-md border px-3 py-2 text-sm""#);
                });
                b.line("/>");
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    fn page() -> String {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        generate_entity_create_page(&ctx.entities[0], &ctx).contents
    }

    #[test]
    fn references_every_field() {
        let out = page();
        assert!(out.contains("'name': string"));
        assert!(out.contains("'credit_limit': string"));
        assert!(out.contains("field_name: 'name', field_type: 'text'"));
        assert!(out.contains("field_name: 'credit_limit', field_type: 'number'"));
    }

    #[test]
    fn posts_entity_with_dynamic_fields() {
        let out = page();
        assert!(out.contains("await heraFetch('entities', {"));
        assert!(out.contains("method: editId ? 'PUT' : 'POST',"));
        assert!(out.contains("smart_code: SMART_CODES.entity,"));
        assert!(out.contains("dynamic_fields: toDynamicFields(form),"));
    }

    #[test]
    fn splits_required_and_optional_sections() {
        let out = page();
        let basic = out.find("Basic Information").unwrap();
        let additional = out.find("Additional Details").unwrap();
        let name_input = out.find("update('name', e.target.value)").unwrap();
        let credit_input = out.find("update('credit_limit', e.target.value)").unwrap();
        assert!(basic < name_input && name_input < additional);
        assert!(additional < credit_input);
    }

    #[test]
    fn number_fields_are_validated() {
        let out = page();
        assert!(out.contains("if (!form['name'].trim()) return 'Name is required'"));
        assert!(out.contains("return 'Credit Limit must be a number'"));
        assert!(out.contains(r#"type="number""#));
    }

    #[test]
    fn boolean_fields_render_checkboxes() {
        let mut pack = sample_pack();
        pack.entities[0].fields.push(FieldDef {
            name: "is_fleet".to_string(),
            field_type: FieldType::Boolean,
            required: false,
            smart_code: "HERA.AUTO.DEALER.FIELD.CUSTOMER.IS_FLEET.v1".to_string(),
            label: None,
        });
        let ctx = GenerationContext::new(&pack);
        let out = generate_entity_create_page(&ctx.entities[0], &ctx).contents;
        assert!(out.contains("'is_fleet': boolean"));
        assert!(out.contains("checked={form['is_fleet']}"));
        assert!(out.contains("update('is_fleet', e.target.checked)"));
    }

    #[test]
    fn no_additional_section_without_optional_fields() {
        let mut pack = sample_pack();
        pack.entities[0].fields.retain(|f| f.required);
        let ctx = GenerationContext::new(&pack);
        let out = generate_entity_create_page(&ctx.entities[0], &ctx).contents;
        assert!(!out.contains("Additional Details"));
    }

    #[test]
    fn wraps_form_in_suspense() {
        let out = page();
        assert!(out.contains("export default function CustomerCreatePage()"));
        assert!(out.contains("<CustomerForm />"));
    }
}
