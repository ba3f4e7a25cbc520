//! Enumerations that operators take as arguments, and the aggregate function
//! names known to the UI.

use serde::{Deserialize, Serialize};

use crate::param::ParamType;

macro_rules! arg_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn from_name(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

arg_enum!(JoinAlgType {
    Inner => "INNER",
    Left => "LEFT",
    Right => "RIGHT",
    Full => "FULL",
});

arg_enum!(SemiJoinType {
    Inner => "INNER",
    Left => "LEFT",
    Semi => "SEMI",
    Anti => "ANTI",
});

arg_enum!(ModifyOperation {
    Insert => "INSERT",
    Update => "UPDATE",
    Delete => "DELETE",
    Merge => "MERGE",
});

arg_enum!(DistributionType {
    Singleton => "SINGLETON",
    HashDistributed => "HASH_DISTRIBUTED",
    RangeDistributed => "RANGE_DISTRIBUTED",
    RandomDistributed => "RANDOM_DISTRIBUTED",
    RoundRobinDistributed => "ROUND_ROBIN_DISTRIBUTED",
    BroadcastDistributed => "BROADCAST_DISTRIBUTED",
    Any => "ANY",
});

/// A value of one of the enum parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumValue {
    Join(JoinAlgType),
    SemiJoin(SemiJoinType),
    Modify(ModifyOperation),
    Distribution(DistributionType),
}

impl EnumValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            EnumValue::Join(_) => ParamType::JoinTypeEnum,
            EnumValue::SemiJoin(_) => ParamType::SemiJoinTypeEnum,
            EnumValue::Modify(_) => ParamType::ModifyOpEnum,
            EnumValue::Distribution(_) => ParamType::DistributionTypeEnum,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnumValue::Join(v) => v.name(),
            EnumValue::SemiJoin(v) => v.name(),
            EnumValue::Modify(v) => v.name(),
            EnumValue::Distribution(v) => v.name(),
        }
    }

    /// Parses `value` as a member of the enum behind `param_type`.
    pub fn parse(param_type: ParamType, value: &str) -> Option<Self> {
        match param_type {
            ParamType::JoinTypeEnum => JoinAlgType::from_name(value).map(EnumValue::Join),
            ParamType::SemiJoinTypeEnum => SemiJoinType::from_name(value).map(EnumValue::SemiJoin),
            ParamType::ModifyOpEnum => ModifyOperation::from_name(value).map(EnumValue::Modify),
            ParamType::DistributionTypeEnum => {
                DistributionType::from_name(value).map(EnumValue::Distribution)
            }
            _ => None,
        }
    }
}

/// Aggregate functions accepted by `Aggregate` arguments.
pub const AGG_FUNCTIONS: &[&str] = &[
    "COUNT",
    "SUM",
    "SUM0",
    "MIN",
    "MAX",
    "AVG",
    "ANY_VALUE",
    "SINGLE_VALUE",
    "STDDEV_POP",
    "STDDEV_SAMP",
    "VAR_POP",
    "VAR_SAMP",
    "COLLECT",
    "LISTAGG",
    "FUSION",
    "BIT_AND",
    "BIT_OR",
    "JSON_OBJECTAGG",
    "JSON_ARRAYAGG",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_checks_the_enum_type() {
        assert_eq!(
            EnumValue::parse(ParamType::JoinTypeEnum, "LEFT"),
            Some(EnumValue::Join(JoinAlgType::Left))
        );
        assert_eq!(EnumValue::parse(ParamType::JoinTypeEnum, "SEMI"), None);
        assert_eq!(
            EnumValue::parse(ParamType::SemiJoinTypeEnum, "SEMI").map(|v| v.param_type()),
            Some(ParamType::SemiJoinTypeEnum)
        );
        assert_eq!(EnumValue::parse(ParamType::Rex, "INNER"), None);
    }
}
