//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a structured `tracing` subscriber for
//! applications embedding `takeout`. The library itself only emits events; it
//! never installs a subscriber on its own.
//!
//! ## What Gets Traced
//!
//! - **create**: a `create` span (`uri`, `method`, `token`) with the optimistic
//!   insert, then `Created` or `Rolled back`.
//! - **read**: a `read` span (`uri`, `key`) with the merge counts and the final
//!   record count.
//! - **Store**: first-use initialization (`Store opened`, with duration) and
//!   individual puts at `debug`.
//! - **Transport**: response status and size at `debug`.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Creates and reads only
//! RUST_LOG=info cargo run
//!
//! # Merge counts, optimistic inserts, store puts
//! RUST_LOG=debug cargo run
//!
//! # Filter to one module
//! RUST_LOG=takeout::resource=debug cargo run
//! ```
//!
//! **With `RUST_LOG=debug`**:
//!
//! ```text
//! DEBUG create: Optimistic insert uri=/posts method=POST token=pending_1
//! DEBUG create:send: Response status=201 bytes=31 uri=/posts method=POST token=pending_1
//!  INFO create: Created uri=/posts method=POST token=pending_1
//! DEBUG read: Merged server=2 optimistic=1 uri=/posts key=id
//!  INFO read: Read count=3 uri=/posts key=id
//! ```

/// Initializes the tracing subscriber.
///
/// Filtering comes from `RUST_LOG`; module paths are hidden and spans are
/// shown inline (`create:send`).
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
