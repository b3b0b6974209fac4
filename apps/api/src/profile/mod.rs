//! User profiles: the document model, per-section validation, the form state
//! machine and the store behind `/api/profile`.

pub mod form;
pub mod handlers;
pub mod models;
pub mod sections;
pub mod store;
pub mod validation;
