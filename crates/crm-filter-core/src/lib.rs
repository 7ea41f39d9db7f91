//! # crm-filter-core
//!
//! Filter condition compiler for the CRM admin surface.
//!
//! List pages for accounts, contacts, opportunities, activities and payments
//! edit filters as flat rows ([`FilterCondition`]) while the remote query
//! engine evaluates and persists boolean trees ([`FilterGroup`]). This crate
//! converts between the two and merges search, advanced and person filters
//! into a single query.
//!
//! ```
//! use crm_filter_core::{FilterCondition, FilterContributions, ListQuery};
//!
//! let conditions = vec![FilterCondition::new("status", "EQUALS", ["open", "won"])];
//! let selection = FilterContributions::new()
//!     .with_search("acme", &["name"])
//!     .with_advanced(&conditions)
//!     .assemble();
//!
//! let query = ListQuery::new().filter(selection);
//! assert!(query.filter_group.is_some());
//! ```

pub mod assembler;
pub mod compiler;
pub mod decompiler;
pub mod defaults;
pub mod editor;
pub mod error;
pub mod logging;
pub mod models;
pub mod operators;
pub mod query;
pub mod schema;
pub mod traits;

// Re-export commonly used types at crate root
pub use assembler::{
    advanced_filter, assemble, person_filter, search_filter, FilterContributions, FilterSelection,
};
pub use compiler::{compile_condition, compile_conditions, compile_nodes};
pub use decompiler::{decompile, decompile_node};
pub use editor::{EditingCell, EditingPart, FilterEditor};
pub use error::{Error, Result};
pub use models::*;
pub use operators::{Operator, OperatorCategory};
pub use query::{ListQuery, SortOrder};
pub use schema::{EntitySchema, FieldDefinition, FieldType, PersonRole};
pub use traits::*;
