use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Value stored in a knob.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
#[serde(untagged)]
pub enum KnobValue {
    Bool(bool),
    Int(i64),
    Double(OrderedFloat<f64>),
    String(String),
}

impl KnobValue {
    pub fn get_as<T: TryGetKnob<T>>(&self) -> Option<T> {
        T::try_get(self)
    }

    /// Name of the variant, used in type mismatch messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            KnobValue::Bool(_) => "bool",
            KnobValue::Int(_) => "int",
            KnobValue::Double(_) => "double",
            KnobValue::String(_) => "string",
        }
    }

    pub fn same_kind(&self, other: &KnobValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<bool> for KnobValue {
    fn from(value: bool) -> Self {
        KnobValue::Bool(value)
    }
}

impl From<i64> for KnobValue {
    fn from(value: i64) -> Self {
        KnobValue::Int(value)
    }
}

impl From<f64> for KnobValue {
    fn from(value: f64) -> Self {
        KnobValue::Double(OrderedFloat(value))
    }
}

impl From<String> for KnobValue {
    fn from(value: String) -> Self {
        KnobValue::String(value)
    }
}

impl From<&str> for KnobValue {
    fn from(value: &str) -> Self {
        KnobValue::String(value.to_string())
    }
}

// Type-safe extraction from KnobValue
pub trait TryGetKnob<T> {
    fn try_get(v: &KnobValue) -> Option<T>;
}

impl TryGetKnob<bool> for bool {
    fn try_get(v: &KnobValue) -> Option<bool> {
        match v {
            KnobValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl TryGetKnob<i64> for i64 {
    fn try_get(v: &KnobValue) -> Option<i64> {
        match v {
            KnobValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl TryGetKnob<f64> for f64 {
    fn try_get(v: &KnobValue) -> Option<f64> {
        match v {
            KnobValue::Double(d) => Some(d.into_inner()),
            KnobValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl TryGetKnob<String> for String {
    fn try_get(v: &KnobValue) -> Option<String> {
        match v {
            KnobValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}
