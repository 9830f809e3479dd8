//! Inkwell entity types.
//!
//! Profiles, articles and claps validate every field on construction and on
//! each setter. Persistence lives in `inkwell-db`; nothing here touches a
//! connection.

pub mod article;
pub mod clap;
pub mod credentials;
pub mod error;
pub mod profile;
pub mod validate;

pub use article::Article;
pub use clap::Clap;
pub use error::ValidationError;
pub use profile::{Profile, ProfileFields};
pub use validate::{DateInput, UuidInput};
