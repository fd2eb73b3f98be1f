//! CareFlow API client
//!
//! Typed, validated access to the CareFlow scheduling and AI-assist REST API,
//! plus the schedule view used by the `careflow` CLI.
//!
//! ```text
//! ClientConfig ─┐
//!               ├─> ApiClient ──> schema::* (validated requests, typed responses)
//! AuthState ────┘        │
//!   (TokenStore)         └──> ScheduleView (live, or sample data on failure)
//! ```
//!
//! Both the client and the session are built explicitly and passed to
//! whatever needs them:
//!
//! ```no_run
//! use std::sync::Arc;
//! use careflow_client::{ApiClient, AuthState, ClientConfig, FileTokenStore};
//!
//! # async fn run() -> careflow_client::ApiResult<()> {
//! let config = ClientConfig::default();
//! let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
//! let auth = AuthState::restore(store).await?;
//! let client = ApiClient::new(config, auth)?;
//! if let Some(user) = client.restore_session().await? {
//!     println!("signed in as {}", user.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod schedule;
pub mod schema;

pub use auth::{AuthState, FileTokenStore, MemoryTokenStore, TokenStore};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use schedule::{can_create_appointment, ScheduleSource, ScheduleView};
