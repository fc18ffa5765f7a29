//! Reusable handler sources and resolver layouts

/// Minimal stage/unit handler
pub const HANDLER: &str = "\
export function request(ctx) {
  return { operation: 'GetItem', key: { id: ctx.args.id } };
}

export function response(ctx) {
  return ctx.result;
}
";

/// Explicit pipeline wrapper
pub const WRAPPER: &str = "\
export function request(ctx) {
  ctx.stash.startedAt = Date.now();
  return {};
}

export function response(ctx) {
  return ctx.prev.result;
}
";

/// Two-stage pipeline on `users`
pub const TWO_STAGE_PIPELINE: &[&str] = &[
    "Query.getUser/2.format.[users].ts",
    "Query.getUser/1.fetch.[users].ts",
];

/// Pipeline whose stages span three data sources
pub const MIXED_PIPELINE: &[&str] = &[
    "Query.listOrders/1.auth.[auth].ts",
    "Query.listOrders/2.fetch.[orders].ts",
    "Query.listOrders/3.enrich.[users].js",
    "Query.listOrders/4.audit.[auth].ts",
];

/// Unit resolvers on two data sources
pub const INDEPENDENT_UNITS: &[&str] = &[
    "Query.getUser.[users].ts",
    "Mutation.updateUser.[orders].ts",
];
