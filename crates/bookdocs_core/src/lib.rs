//! Bookdocs core: pure naming and routing rules, free of any IO.
mod document;
mod policy;
mod route;

pub use document::{classify, derive_title, DocumentKind, CHAPTER_PREFIX, NAVIGATION_STEM};
pub use policy::ErrorPolicy;
pub use route::{chapter_dir_name, OutputLayout, Route};
