//! # crm-filter-client
//!
//! reqwest client for the CRM API endpoints the filter core depends on:
//! the per-entity list query and the saved filter store.
//!
//! ```no_run
//! use crm_filter_client::{ClientConfig, HttpCrmClient};
//! use crm_filter_core::{EntityType, ListQuery, RecordQueryEngine};
//!
//! # async fn run() -> crm_filter_core::Result<()> {
//! let client = HttpCrmClient::new(ClientConfig::default().with_api_key("secret"))?;
//! let page = client.list_records(EntityType::Account, &ListQuery::new()).await?;
//! println!("{} accounts", page.total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;

pub use config::{ClientConfig, ConfigError, ConfigResult};
pub use http::HttpCrmClient;
