//! polyalg-digest: turns expressions into canonical PolyAlg text.
//!
//! - `replacer`: `NameReplacer`, the expression visitor that resolves field
//!   indexes to names and decides literal type elision.
//! - `literal`: digest rules for literals.
//! - `graph`: node/edge/path literal rendering.
//! - `util`: identifier sanitization, alias appending, list joining and
//!   field-name uniquification.

#![forbid(unsafe_code)]

pub mod graph;
pub mod literal;
pub mod replacer;
pub mod util;

pub use literal::{literal_digest, should_include_type, DigestIncludeType};
pub use replacer::{digest_with_names, NameReplacer};
pub use util::{
    append_alias, append_aliases, join_multi_valued, join_multi_valued_with_brackets,
    sanitize_identifier, uniquify,
};
