//! When does a literal print its type?

use polyalg_core::rex::RexLiteral;
use polyalg_core::schema::PolyType;
use polyalg_core::value::PolyValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestIncludeType {
    Always,
    /// Resolved per literal by `should_include_type`.
    Optional,
    NoType,
}

/// Resolves `Optional` for a single literal, without looking at its context.
pub fn should_include_type(literal: &RexLiteral) -> DigestIncludeType {
    let ty = &literal.ty;
    if ty.nullable {
        return DigestIncludeType::Always;
    }
    match ty.poly_type {
        PolyType::Boolean | PolyType::Integer | PolyType::Symbol => DigestIncludeType::NoType,
        PolyType::Char => match (&literal.value, ty.precision) {
            (PolyValue::String(s), Some(p)) if s.chars().count() == p as usize => {
                DigestIncludeType::NoType
            }
            _ => DigestIncludeType::Always,
        },
        t if t.is_temporal() && ty.precision.unwrap_or(0) == 0 => DigestIncludeType::NoType,
        _ => DigestIncludeType::Always,
    }
}

/// Value text, followed by `:TYPE` when the type is included.
/// The printed type never carries the ` NOT NULL` suffix.
pub fn literal_digest(literal: &RexLiteral, include: DigestIncludeType) -> String {
    let include = match include {
        DigestIncludeType::Optional => should_include_type(literal),
        other => other,
    };
    let value = literal.value.digest();
    match include {
        DigestIncludeType::Always => format!("{}:{}", value, literal.ty.type_string()),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyalg_core::schema::AlgDataType;

    fn lit(value: PolyValue, ty: AlgDataType) -> RexLiteral {
        RexLiteral { value, ty }
    }

    #[test]
    fn not_null_integer_drops_type() {
        let l = lit(PolyValue::Integer(10), AlgDataType::new(PolyType::Integer));
        assert_eq!(literal_digest(&l, DigestIncludeType::Optional), "10");
    }

    #[test]
    fn nullable_always_prints_type() {
        let l = lit(PolyValue::Integer(10), AlgDataType::nullable(PolyType::Integer));
        assert_eq!(literal_digest(&l, DigestIncludeType::Optional), "10:INTEGER");
    }

    #[test]
    fn bigint_prints_type_without_not_null() {
        let l = lit(PolyValue::Integer(7), AlgDataType::new(PolyType::Bigint));
        assert_eq!(literal_digest(&l, DigestIncludeType::Optional), "7:BIGINT");
        assert_eq!(literal_digest(&l, DigestIncludeType::NoType), "7");
    }

    #[test]
    fn char_filling_precision_drops_type() {
        let full = lit(
            PolyValue::string("abc"),
            AlgDataType::new(PolyType::Char).with_precision(3),
        );
        let short = lit(
            PolyValue::string("ab"),
            AlgDataType::new(PolyType::Char).with_precision(3),
        );
        assert_eq!(literal_digest(&full, DigestIncludeType::Optional), "'abc'");
        assert_eq!(literal_digest(&short, DigestIncludeType::Optional), "'ab':CHAR(3)");
    }

    #[test]
    fn temporal_with_zero_precision_drops_type() {
        let d = lit(
            PolyValue::Temporal("2024-01-31".into()),
            AlgDataType::new(PolyType::Date),
        );
        assert_eq!(should_include_type(&d), DigestIncludeType::NoType);
        let ts = lit(
            PolyValue::Temporal("2024-01-31 10:00:00.123".into()),
            AlgDataType::new(PolyType::Timestamp).with_precision(3),
        );
        assert_eq!(
            literal_digest(&ts, DigestIncludeType::Optional),
            "2024-01-31 10:00:00.123:TIMESTAMP(3)"
        );
    }
}
