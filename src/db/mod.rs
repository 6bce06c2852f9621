// SPDX-License-Identifier: MIT

//! Storage layer: remote JSON CRUD collaborator, local cache, and the
//! fallback combinator that the rest of the application talks to.

pub mod cache;
pub mod remote;
pub mod store;

pub use cache::JsonCache;
pub use remote::RemoteStore;
pub use store::Store;
