pub mod archive;
pub mod category;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod kind;
pub mod model;
pub mod report;
pub mod resolve;
pub mod xml;

pub use error::{AuditError, Result};
