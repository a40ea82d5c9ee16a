//! Shared domain types.

mod id;
mod product;
mod session;

pub use id::ProductId;
pub use product::{Product, ProductDraft, ValidationError};
pub use session::{Role, RoleParseError, Session};
