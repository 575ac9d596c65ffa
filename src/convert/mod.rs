//! # Conversion Capability
//!
//! Answers whether a declared type can be turned into a string property and
//! back. The classifier only ever asks `can_convert`; how values are actually
//! converted is up to the implementation.
//!
//! `DefaultConversionService` covers scalars, wrappers and temporals, and
//! accepts extra convertible pairs registered by the application.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use hashbrown::HashSet;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

use crate::model::Value;
use crate::types::{Primitive, TemporalKind, TypeDescriptor};
use crate::{Error, Result};

/// Conversion contract consumed by the serializable/deserializable queries.
pub trait ConversionService: Send + Sync {
    fn can_convert(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> bool;
}

/// Built-in conversions to and from `String`.
#[derive(Debug, Clone, Default)]
pub struct DefaultConversionService {
    extra: HashSet<(TypeDescriptor, TypeDescriptor)>,
}

impl DefaultConversionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a one-directional convertible pair.
    pub fn add_convertible(&mut self, from: TypeDescriptor, to: TypeDescriptor) -> &mut Self {
        self.extra.insert((from, to));
        self
    }

    fn is_string_convertible(t: &TypeDescriptor) -> bool {
        matches!(
            t,
            TypeDescriptor::Primitive(_)
                | TypeDescriptor::Wrapper(_)
                | TypeDescriptor::String
                | TypeDescriptor::Temporal(_)
        )
    }

    /// Render a value as its string property form.
    pub fn to_graph_string(&self, value: &Value) -> Result<String> {
        match value {
            Value::Bool(b) => Ok(b.to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Char(c) => Ok(c.to_string()),
            Value::String(s) => Ok(s.clone()),
            Value::Date(d) => Ok(d.format(DATE_FORMAT).to_string()),
            Value::Time(t) => Ok(t.format(TIME_FORMAT).to_string()),
            Value::DateTime(dt) => Ok(dt.to_rfc3339()),
            other => Err(Error::Conversion(format!(
                "cannot convert {} to a string property",
                other.type_name()
            ))),
        }
    }

    /// Parse a string property back into a value of the declared type.
    pub fn from_graph_string(&self, raw: &str, target: &TypeDescriptor) -> Result<Value> {
        let fail = |reason: String| Error::Conversion(format!("'{}' as {}: {}", raw, target, reason));
        match target {
            TypeDescriptor::String => Ok(Value::String(raw.to_string())),
            TypeDescriptor::Primitive(p) | TypeDescriptor::Wrapper(p) => match p {
                Primitive::Bool => raw.parse::<bool>().map(Value::Bool).map_err(|e| fail(e.to_string())),
                Primitive::Char => {
                    let mut chars = raw.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(Value::Char(c)),
                        _ => Err(fail("expected exactly one character".into())),
                    }
                }
                Primitive::F32 => {
                    let f = raw.parse::<f32>().map_err(|e| fail(e.to_string()))?;
                    // Overflowing literals parse to infinity.
                    if f.is_infinite() && raw.parse::<f64>().is_ok_and(f64::is_finite) {
                        return Err(fail("out of range for a 32-bit float".into()));
                    }
                    Ok(Value::from(f))
                }
                Primitive::F64 => raw.parse::<f64>().map(Value::Float).map_err(|e| fail(e.to_string())),
                Primitive::I8 => raw.parse::<i8>().map(Value::from).map_err(|e| fail(e.to_string())),
                Primitive::I16 => raw.parse::<i16>().map(Value::from).map_err(|e| fail(e.to_string())),
                Primitive::I32 => raw.parse::<i32>().map(Value::from).map_err(|e| fail(e.to_string())),
                Primitive::I64 => raw.parse::<i64>().map(Value::Int).map_err(|e| fail(e.to_string())),
            },
            TypeDescriptor::Temporal(TemporalKind::DateTime) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|e| fail(e.to_string())),
            TypeDescriptor::Temporal(TemporalKind::Date) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|e| fail(e.to_string())),
            TypeDescriptor::Temporal(TemporalKind::Time) => NaiveTime::parse_from_str(raw, TIME_FORMAT)
                .map(Value::Time)
                .map_err(|e| fail(e.to_string())),
            _ => Err(fail("no string conversion registered".into())),
        }
    }
}

impl ConversionService for DefaultConversionService {
    fn can_convert(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> bool {
        if self.extra.contains(&(from.clone(), to.clone())) {
            return true;
        }
        match (from, to) {
            (t, TypeDescriptor::String) | (TypeDescriptor::String, t) => Self::is_string_convertible(t),
            _ => from == to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassType;

    #[test]
    fn test_scalars_convert_both_ways() {
        let svc = DefaultConversionService::new();
        let long = TypeDescriptor::Wrapper(Primitive::I64);
        assert!(svc.can_convert(&long, &TypeDescriptor::String));
        assert!(svc.can_convert(&TypeDescriptor::String, &long));
        let date = TypeDescriptor::Temporal(TemporalKind::Date);
        assert!(svc.can_convert(&date, &TypeDescriptor::String));
    }

    #[test]
    fn test_classes_need_registration() {
        let mut svc = DefaultConversionService::new();
        let money: TypeDescriptor = ClassType::plain("app.Money").into();
        assert!(!svc.can_convert(&money, &TypeDescriptor::String));

        svc.add_convertible(money.clone(), TypeDescriptor::String);
        assert!(svc.can_convert(&money, &TypeDescriptor::String));
        assert!(!svc.can_convert(&TypeDescriptor::String, &money));
    }

    #[test]
    fn test_to_graph_string() {
        let svc = DefaultConversionService::new();
        assert_eq!(svc.to_graph_string(&Value::Int(42)).unwrap(), "42");
        assert_eq!(svc.to_graph_string(&Value::Char('z')).unwrap(), "z");
        assert!(svc.to_graph_string(&Value::List(vec![])).is_err());
    }

    #[test]
    fn test_from_graph_string() {
        let svc = DefaultConversionService::new();
        let v = svc.from_graph_string("17", &TypeDescriptor::Primitive(Primitive::I16)).unwrap();
        assert_eq!(v, Value::Int(17));
        let v = svc.from_graph_string("true", &TypeDescriptor::Wrapper(Primitive::Bool)).unwrap();
        assert_eq!(v, Value::Bool(true));
        assert!(svc.from_graph_string("300", &TypeDescriptor::Primitive(Primitive::I8)).is_err());
        assert!(svc.from_graph_string("ab", &TypeDescriptor::Primitive(Primitive::Char)).is_err());

        let dt = svc
            .from_graph_string("2011-03-04T10:00:00+00:00", &TypeDescriptor::Temporal(TemporalKind::DateTime))
            .unwrap();
        assert_eq!(svc.to_graph_string(&dt).unwrap(), "2011-03-04T10:00:00+00:00");
    }

    #[test]
    fn test_f32_range() {
        let svc = DefaultConversionService::new();
        let float = TypeDescriptor::Wrapper(Primitive::F32);
        assert_eq!(svc.from_graph_string("1.5", &float).unwrap(), Value::Float(1.5));
        assert!(matches!(svc.from_graph_string("1e300", &float), Err(Error::Conversion(_))));
        assert_eq!(svc.from_graph_string("inf", &float).unwrap(), Value::Float(f64::INFINITY));

        let double = TypeDescriptor::Primitive(Primitive::F64);
        assert_eq!(svc.from_graph_string("1e300", &double).unwrap(), Value::Float(1e300));
    }

    #[test]
    fn test_temporal_values_round_trip() {
        let svc = DefaultConversionService::new();

        let date = TypeDescriptor::Temporal(TemporalKind::Date);
        let v = svc.from_graph_string("2011-03-04", &date).unwrap();
        assert_eq!(v, Value::Date(NaiveDate::from_ymd_opt(2011, 3, 4).unwrap()));
        assert_eq!(svc.to_graph_string(&v).unwrap(), "2011-03-04");

        let time = TypeDescriptor::Temporal(TemporalKind::Time);
        let v = svc.from_graph_string("10:30:15.250", &time).unwrap();
        assert_eq!(v, Value::Time(NaiveTime::from_hms_milli_opt(10, 30, 15, 250).unwrap()));
        assert_eq!(svc.to_graph_string(&v).unwrap(), "10:30:15.250");

        assert!(svc.from_graph_string("2011-13-01", &date).is_err());
    }
}
