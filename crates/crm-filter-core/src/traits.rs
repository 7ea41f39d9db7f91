//! Interfaces to the remote services the filter core talks to.
//!
//! The query engine and the saved filter store live outside this crate. These
//! traits describe what the core needs from them so that the HTTP client and
//! in-memory test doubles are interchangeable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::decompiler::decompile;
use crate::error::Result;
use crate::models::{CreateSavedFilterRequest, EntityType, FilterCondition, SavedFilter};
use crate::query::ListQuery;

// =============================================================================
// QUERY ENGINE
// =============================================================================

/// One page of records returned by the query engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    /// Records as returned by the remote API; their shape is entity-specific.
    #[serde(default)]
    pub data: Vec<JsonValue>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Remote engine evaluating list queries.
#[async_trait]
pub trait RecordQueryEngine: Send + Sync {
    /// Run a list query against an entity's records.
    async fn list_records(&self, entity: EntityType, query: &ListQuery) -> Result<RecordPage>;
}

// =============================================================================
// SAVED FILTER STORE
// =============================================================================

/// Remote store owning saved filters.
#[async_trait]
pub trait SavedFilterStore: Send + Sync {
    /// Persist a new saved filter.
    async fn save(&self, req: CreateSavedFilterRequest) -> Result<SavedFilter>;

    /// Fetch a saved filter by id.
    async fn load(&self, id: &str) -> Result<SavedFilter>;

    /// List saved filters visible for an entity.
    async fn list(&self, entity: EntityType) -> Result<Vec<SavedFilter>>;

    /// Delete a saved filter.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Load a saved filter and flatten it into editor rows.
pub async fn load_saved_conditions<S>(store: &S, id: &str) -> Result<Vec<FilterCondition>>
where
    S: SavedFilterStore + ?Sized,
{
    let saved = store.load(id).await?;
    Ok(decompile(&saved.filter_group))
}
