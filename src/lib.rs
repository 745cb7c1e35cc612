//! # Takeout
//!
//! > **Optimistic, locally cached access to JSON collection endpoints.**
//!
//! A [`Resource`] is bound to one URI. `create` shows its payload in every
//! later `read` straight away, then swaps in the record the server confirmed
//! (or drops it again if the server refused). `read` merges those optimistic
//! records with the server's collection and writes every returned record to a
//! local key-value store.
//!
//! ## 🚀 Quick Start
//!
//! ```no_run
//! use takeout::{takeout, CreateOptions, ReadOptions, ResourceOptions};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let posts = takeout("https://api.example.com/posts", ResourceOptions::default())?;
//!
//! let draft = takeout::model::into_record(json!({ "title": "Hello" })).unwrap_or_default();
//! let created = posts.create(draft, CreateOptions::default()).await?;
//! println!("server assigned id {}", created["id"]);
//!
//! let all = posts.read(ReadOptions::default()).await?;
//! println!("{} posts", all.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each layer defines its own error enum ([`TransportError`](transport::TransportError),
//! [`StoreError`](store::StoreError), [`ResourceError`]). Resource errors wrap
//! the collaborator errors unchanged via `#[from]`, so callers can match on
//! the precise failure.
//!
//! ### 2. Injected Collaborators
//! HTTP and persistence sit behind the [`Transport`] and [`KeyValueStore`]
//! traits. [`Takeout`] wires the production pair (`reqwest` + SQLite); tests
//! swap in [`mock::MockTransport`] and [`InMemoryStore`].
//!
//! ### 3. Concurrency Model
//! Resources are shared by reference. Each one owns its optimistic log behind
//! a mutex that is never held across an `.await`; reads work on a snapshot.
//!
//! ### 4. Observability
//! `create` and `read` run inside `tracing` spans. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`resource`]: `create`/`read`, the optimistic log and the merge.
//! - [`store`]: the [`KeyValueStore`] seam, [`SqliteStore`] and [`InMemoryStore`].
//! - [`transport`]: request/response types and the `reqwest` transport.
//! - [`collection`]: the ordered [`Collection`] a read returns.
//! - [`model`]: [`Record`] and [`RecordKey`].
//! - [`lifecycle`]: [`Takeout`] wiring, the [`takeout()`] factory, tracing setup.
//! - [`mock`]: test doubles for the transport.

pub mod collection;
pub mod lifecycle;
pub mod mock;
pub mod model;
pub mod resource;
pub mod store;
pub mod transport;

pub use collection::Collection;
pub use lifecycle::{setup_tracing, takeout, Takeout, TakeoutConfig};
pub use model::{Record, RecordKey};
pub use resource::{
    CreateOptions, Payload, ReadOptions, RequestOptions, Resource, ResourceError, ResourceOptions,
};
pub use store::{InMemoryStore, KeyValueStore, SqliteStore, StoreConfig, StoreError};
pub use transport::{HttpTransport, Transport, TransportError};
