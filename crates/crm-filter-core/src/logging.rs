//! Structured logging field name constants for crm-filter.
//!
//! Every crate in the workspace uses these names so log aggregation can query
//! filter activity by the same keys whether it came from the core or the client.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Remote store unusable, requires operator attention |
//! | WARN  | Remote call failed, caller gets an error |
//! | INFO  | Client lifecycle, saved filter writes |
//! | DEBUG | Compile/assemble decisions, dropped conditions, precision loss |
//! | TRACE | Per-rule and per-leaf iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Component within the workspace.
/// Examples: "compiler", "assembler", "decompiler", "http_client"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "compile", "assemble", "decompile", "list_records"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// CRM entity type being queried ("account", "contact", ...).
pub const ENTITY_TYPE: &str = "entity_type";

/// Saved filter identifier.
pub const SAVED_FILTER_ID: &str = "saved_filter_id";

/// Field key targeted by a rule or condition.
pub const FIELD_KEY: &str = "field_key";

/// Operator name of a rule or condition.
pub const CONDITION: &str = "condition";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of flat conditions fed into the compiler or produced by decompile.
pub const CONDITION_COUNT: &str = "condition_count";

/// Number of leaf rules in a compiled tree.
pub const RULE_COUNT: &str = "rule_count";

/// Number of non-empty filter contributions merged by the assembler.
pub const CONTRIBUTION_COUNT: &str = "contribution_count";

/// Number of values carried by a condition.
pub const VALUE_COUNT: &str = "value_count";

/// Number of records returned by the remote query engine.
pub const RESULT_COUNT: &str = "result_count";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// HTTP status returned by the remote endpoint.
pub const STATUS: &str = "status";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
