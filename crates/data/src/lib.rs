//! Level list retrieval, normalization and the built-in fallback list.

pub mod error;
pub mod fallback;
pub mod load;
pub mod media;
pub mod schema;
pub mod source;

pub use error::*;
pub use fallback::*;
pub use load::*;
pub use media::*;
pub use schema::*;
pub use source::*;
