//! Auth middleware for the generated API routes
//!
//! `auth.ts` resolves the acting user from the bearer token and the
//! organization from `x-hera-org-id`, checks `MEMBER_OF` membership, and
//! enforces the `deployment.roles` permission matrix.

use crate::context::GenerationContext;
use crate::source::{js_string, FileKind, GeneratedFile, SourceBuilder};

/// Permission strings the generated routes ask for.
pub const PERMISSIONS: [&str; 4] = [
    "entities:read",
    "entities:write",
    "transactions:read",
    "transactions:write",
];

pub fn generate_middleware(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let roles = &ctx.pack.deployment.roles;

    let mut b = SourceBuilder::with_header(&ctx.source_note());
    b.import(&["NextResponse"], "next/server");
    b.import(&["createClient", "type SupabaseClient"], "@supabase/supabase-js");
    b.blank();

    b.line("/** Role → permissions, from the app pack's deployment block. */");
    b.block(
        "export const ROLE_PERMISSIONS: Record<string, readonly string[]> = {",
        "}",
        |b| {
            for (role, perms) in roles {
                let perms: Vec<String> = perms.iter().map(|p| js_string(p)).collect();
                b.line(format!("{}: [{}],", js_string(role), perms.join(", ")));
            }
        },
    );
    b.blank();
    if roles.is_empty() {
        b.line("// No roles declared: membership alone grants access.");
    }
    b.line(format!("const ENFORCE_ROLES = {}", !roles.is_empty()));
    b.blank();

    b.block("export class HeraAuthError extends Error {", "}", |b| {
        b.block(
            "constructor(message: string, readonly status: number) {",
            "}",
            |b| {
                b.line("super(message)");
                b.line("this.name = 'HeraAuthError'");
            },
        );
    });
    b.blank();
    b.block("export interface HeraContext {", "}", |b| {
        b.lines([
            "actorUserId: string",
            "organizationId: string",
            "role: string",
            "supabase: SupabaseClient",
        ]);
    });
    b.blank();

    b.block(
        "export function hasPermission(role: string, permission: string): boolean {",
        "}",
        |b| {
            b.line("if (!ENFORCE_ROLES) return true");
            b.line("const granted = ROLE_PERMISSIONS[role] ?? []");
            b.line("const [resource] = permission.split(':')");
            b.line("return granted.includes('*') || granted.includes(permission) || granted.includes(`${resource}:*`)");
        },
    );
    b.blank();

    b.block("export function getServiceClient(): SupabaseClient {", "}", |b| {
        b.line("const url = process.env.SUPABASE_URL");
        b.line("const key = process.env.SUPABASE_SERVICE_ROLE_KEY");
        b.block("if (!url || !key) {", "}", |b| {
            b.line("throw new HeraAuthError('SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY must be set', 500)");
        });
        b.line("return createClient(url, key, { auth: { persistSession: false } })");
    });
    b.blank();

    b.line("/** Resolve actor, organization and role; throws HeraAuthError on failure. */");
    b.block(
        "export async function requireHeraContext(request: Request, permission?: string): Promise<HeraContext> {",
        "}",
        |b| {
            b.line("const header = request.headers.get('authorization') ?? ''");
            b.line("const token = header.startsWith('Bearer ') ? header.slice('Bearer '.length).trim() : ''");
            b.line("if (!token) throw new HeraAuthError('Missing bearer token', 401)");
            b.blank();
            b.line("const organizationId = request.headers.get('x-hera-org-id')");
            b.line("if (!organizationId) throw new HeraAuthError('Missing x-hera-org-id header', 400)");
            b.blank();
            b.line("const supabase = getServiceClient()");
            b.line("const { data: auth, error: authError } = await supabase.auth.getUser(token)");
            b.line("if (authError || !auth.user) throw new HeraAuthError('Invalid or expired token', 401)");
            b.line("const actorUserId = auth.user.id");
            b.blank();
            b.line("const { data: membership, error: membershipError } = await supabase");
            b.indented(|b| {
                b.lines([
                    ".from('core_relationships')",
                    ".select('relationship_data')",
                    ".eq('from_entity_id', actorUserId)",
                    ".eq('to_entity_id', organizationId)",
                    ".eq('relationship_type', 'MEMBER_OF')",
                    ".maybeSingle()",
                ]);
            });
            b.line("if (membershipError) throw new HeraAuthError(membershipError.message, 500)");
            b.line("if (!membership) throw new HeraAuthError('Actor is not a member of this organization', 403)");
            b.blank();
            b.line("const role: string = membership.relationship_data?.role ?? 'member'");
            b.block("if (permission && !hasPermission(role, permission)) {", "}", |b| {
                b.line("throw new HeraAuthError(`Role '${role}' lacks permission '${permission}'`, 403)");
            });
            b.line("return { actorUserId, organizationId, role, supabase }");
        },
    );
    b.blank();

    b.block("export function errorResponse(err: unknown): NextResponse {", "}", |b| {
        b.block("if (err instanceof HeraAuthError) {", "}", |b| {
            b.line("return NextResponse.json({ error: err.message }, { status: err.status })");
        });
        b.line("const message = err instanceof Error ? err.message : String(err)");
        b.line("return NextResponse.json({ error: message }, { status: 500 })");
    });

    GeneratedFile::new(ctx.middleware_path(), FileKind::Middleware, b.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    #[test]
    fn role_matrix_from_deployment() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let file = generate_middleware(&ctx);
        assert_eq!(file.kind, FileKind::Middleware);
        assert!(file.path.ends_with("src/middleware/dealer-ops/auth.ts"));
        assert!(file.contents.contains("'owner': ['*'],"));
        assert!(file
            .contents
            .contains("'sales': ['entities:read', 'transactions:write'],"));
        assert!(file.contents.contains("const ENFORCE_ROLES = true"));
    }

    #[test]
    fn no_roles_disables_enforcement() {
        let mut pack = sample_pack();
        pack.deployment.roles.clear();
        let ctx = GenerationContext::new(&pack);
        let out = generate_middleware(&ctx).contents;
        assert!(out.contains("const ENFORCE_ROLES = false"));
    }

    #[test]
    fn checks_membership_before_returning_context() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let out = generate_middleware(&ctx).contents;
        let membership = out.find(".eq('relationship_type', 'MEMBER_OF')").unwrap();
        let ret = out.find("return { actorUserId, organizationId, role, supabase }").unwrap();
        assert!(membership < ret);
    }
}
