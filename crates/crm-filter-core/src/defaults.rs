//! Centralized default constants for crm-filter.
//!
//! **This module is the single source of truth** for shared default values.
//! The client, the CLI and the core reference these constants instead of
//! defining their own magic numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// First page number (the remote API is 1-based).
pub const PAGE: u32 = 1;

/// Default page size for entity list queries.
pub const PAGE_LIMIT: u32 = 50;

/// Largest page size the remote API accepts.
pub const PAGE_LIMIT_MAX: u32 = 500;

// =============================================================================
// FILTER ENCODING
// =============================================================================

/// Separator used for the legacy scalar mirror of multi-value rules.
pub const VALUE_SEPARATOR: &str = ",";

/// Value sent for operators that take no comparison value.
pub const NO_VALUE: &str = "";

// =============================================================================
// PERSON FILTER
// =============================================================================

/// Candidate field names for the "assigned to" person role.
///
/// Entities disagree on spelling, so every candidate present in the schema
/// receives its own rule.
pub const ASSIGNED_TO_FIELDS: &[&str] = &["assignedTo", "assignTo"];

/// Candidate field names for the "created by" person role.
pub const CREATED_BY_FIELDS: &[&str] = &["createdBy", "createdById"];

// =============================================================================
// CLIENT
// =============================================================================

/// Default base URL of the remote CRM API.
pub const API_URL: &str = "http://localhost:8080/api";

/// Default HTTP request timeout in seconds.
pub const API_TIMEOUT_SECS: u64 = 30;

/// Path segment of the saved filter resource.
pub const SAVED_FILTERS_PATH: &str = "/saved-filters";
