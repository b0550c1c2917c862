//! # tagsync
//!
//! A client-side search and synchronization engine for tagged key-value
//! stores.
//!
//! tagsync keeps a visible list of tagged items consistent with a remote
//! REST store: debounced tag search, optimistic local mutation (create,
//! tag add/remove, delete), and reconciliation of concurrent operations.
//! The remote store and the rendering layer are both abstract; the engine
//! owns only the state machine in between.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌──────────────────┐
//! │ user input │──▶│ Debouncer │──▶│ SearchController │──┐
//! └────────────┘   └───────────┘   └──────────────────┘  │   ┌─────────┐
//!                                                        ├──▶│  Store  │
//! ┌────────────┐                   ┌──────────────────┐  │   │ (HTTP)  │
//! │ item click │──────────────────▶│  ItemController  │──┘   └─────────┘
//! └────────────┘                   └────────┬─────────┘
//!                                           ▼
//!                                  ┌─────────────────┐
//!                                  │ ListModel /View │
//!                                  └─────────────────┘
//! ```
//!
//! The one strict ordering guarantee: search results apply in issuance
//! order, not arrival order. Each accepted search carries a sequence
//! number, and a response is discarded unless its number is still
//! current. Item mutations are optimistic with rollback on failure.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Items, queries, input validation |
//! | [`error`] | Error taxonomy |
//! | [`store`] | Remote store trait, HTTP and in-memory backends |
//! | [`debounce`] | Single-slot delayed execution |
//! | [`list`] | Shared visible-list projection |
//! | [`view`] | Render sink abstraction |
//! | [`search`] | Search controller (supersession rule) |
//! | [`item`] | Item controller (optimistic mutation) |

pub mod config;
pub mod debounce;
pub mod error;
pub mod item;
pub mod list;
pub mod models;
pub mod search;
pub mod store;
pub mod view;
