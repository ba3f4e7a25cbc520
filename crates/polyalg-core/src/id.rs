//! Name-based identifiers used across the PolyAlg crates.
//!
//! Identifiers are compared by their string content; `new` keeps a borrowed
//! `'static` name so built-in declarations do not allocate.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

macro_rules! new_name {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            pub const fn new(v: &'static str) -> Self {
                Self(Cow::Borrowed(v))
            }
            pub fn owned(v: impl Into<String>) -> Self {
                Self(Cow::Owned(v.into()))
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

new_name!(OperatorId);
new_name!(ConventionId);
new_name!(CorrelationId);

impl OperatorId {
    /// Identity derived from a Rust type's path, e.g. `engine::rel::LogicalRelFilter`.
    pub fn of<T: ?Sized>() -> Self {
        Self::owned(std::any::type_name::<T>())
    }

    /// Last path segment without generic arguments.
    pub fn simple_name(&self) -> &str {
        let base = self.0.split('<').next().unwrap_or(&self.0);
        base.rsplit("::").next().unwrap_or(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LogicalRelFilter;

    #[test]
    fn simple_name_strips_module_path() {
        let id = OperatorId::of::<LogicalRelFilter>();
        assert_eq!(id.simple_name(), "LogicalRelFilter");
        assert_eq!(OperatorId::new("Plain").simple_name(), "Plain");
        assert_eq!(OperatorId::new("a::b::Wrap<c::D>").simple_name(), "Wrap");
    }

    #[test]
    fn borrowed_and_owned_compare_equal() {
        assert_eq!(OperatorId::new("X"), OperatorId::owned("X".to_string()));
    }
}
