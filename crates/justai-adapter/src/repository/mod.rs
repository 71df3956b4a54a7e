//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from justai-domain.
//! Both adapters share the document shapes in `document`.

pub mod document;
pub mod in_memory;
pub mod mongo;
