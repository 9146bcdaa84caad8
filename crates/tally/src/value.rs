//! Dynamic value representation
//!
//! Assertions record "any" actual/expected value, so the result model carries
//! a small dynamic value type:
//! - Null, Bool, Int, Float: immediate values
//! - String: reference-counted, immutable
//! - Array, Map: owned, ordered, value semantics
//! - Object: shared, mutable record with identity (may form cycles)
//! - Error: a captured [`Fault`]
//! - Opaque: anything that can only be named, not inspected

use crate::fault::Fault;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Runtime value recorded by assertions
#[derive(Clone)]
pub enum Value {
    /// Explicit null (distinct from "no value supplied")
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value (reference-counted, immutable)
    String(Rc<String>),
    /// Ordered list, keyed by position
    Array(Vec<Value>),
    /// Ordered string-keyed map (insertion order preserved)
    Map(Vec<(String, Value)>),
    /// Record with identity
    Object(ObjectRef),
    /// Captured error
    Error(Rc<Fault>),
    /// Value of a type that exposes nothing but its name
    Opaque(String),
}

impl Value {
    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::new(s.into()))
    }

    /// Create a new array value
    pub fn array<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }

    /// Create a new map value, preserving the given key order
    pub fn map<K: Into<String>, T: Into<Value>>(entries: impl IntoIterator<Item = (K, T)>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Snapshot an inspectable value into an object
    pub fn inspect<T: Inspect + ?Sized>(subject: &T) -> Self {
        Value::Object(ObjectRef::from_fields(subject.type_name(), subject.fields()))
    }

    /// Wrap a value whose contents cannot be shown
    pub fn opaque<T: ?Sized>() -> Self {
        Value::Opaque(short_type_name(std::any::type_name::<T>()).to_string())
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Object(object) => object.type_name(),
            Value::Error(fault) => fault.kind().to_string(),
            Value::Opaque(name) => name.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Value::Error(fault) => Some(fault),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Strict equality: same variant and same content.
    ///
    /// Objects and errors have identity; two of them are equal only if they
    /// are the same allocation.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format(self, false))
    }
}

/// Shared, mutable record with identity.
///
/// Cloning an `ObjectRef` aliases the same record, which is how cyclic
/// structures are built.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

struct Object {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl ObjectRef {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::from_fields(type_name.into(), Vec::new())
    }

    pub fn from_fields(type_name: String, fields: Vec<(String, Value)>) -> Self {
        ObjectRef(Rc::new(RefCell::new(Object { type_name, fields })))
    }

    /// Builder-style field assignment
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set (or replace) a field; visible through every alias
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        let mut object = self.0.borrow_mut();

        match object.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => object.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0
            .borrow()
            .fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.clone())
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name.clone()
    }

    /// Snapshot of the fields, in declaration order
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.0.borrow().fields.clone()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address used as identity while formatting
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({} @ {:#x})", self.type_name(), self.addr())
    }
}

/// Testing-only accessor capability.
///
/// Types that want their internals shown in failure output (or inspected by
/// a test) expose them here, including fields that are not public.
pub trait Inspect {
    /// Name shown for the type; defaults to the unqualified Rust type name
    fn type_name(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }

    /// Fields in display order
    fn fields(&self) -> Vec<(String, Value)>;
}

/// `alloc::vec::Vec<u8>` -> `Vec`, `core::num::ParseIntError` -> `ParseIntError`
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(n as i64)
                }
            }
        )*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32, isize, usize);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::string(s.as_str())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::array(values)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Fault> for Value {
    fn from(fault: Fault) -> Self {
        Value::Error(Rc::new(fault))
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_equality_distinguishes_types() {
        assert_ne!(Value::from(123), Value::from("123"));
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::Null, Value::from(false));
        assert_eq!(Value::from("abc"), Value::from(String::from("abc")));
    }

    #[test]
    fn test_arrays_compare_by_content_and_order() {
        assert_eq!(Value::array([1, 2, 3]), Value::array([1, 2, 3]));
        assert_ne!(Value::array([1, 2, 3]), Value::array([3, 2, 1]));
        assert_ne!(Value::array([1, 2]), Value::map([("0", 1), ("1", 2)]));
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let a = ObjectRef::new("Point").with("x", 1);
        let b = ObjectRef::new("Point").with("x", 1);

        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_option_conversion() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some(5)), Value::Int(5));
    }

    #[test]
    fn test_object_set_replaces_field() {
        let object = ObjectRef::new("Counter").with("count", 1);
        object.set("count", 2);

        assert_eq!(object.get("count"), Some(Value::Int(2)));
        assert_eq!(object.fields().len(), 1);
    }

    #[test]
    fn test_inspect_snapshot() {
        struct Account {
            owner: String,
            balance: i64,
        }

        impl Inspect for Account {
            fn fields(&self) -> Vec<(String, Value)> {
                vec![
                    ("owner".to_string(), Value::from(&self.owner)),
                    ("balance".to_string(), Value::from(self.balance)),
                ]
            }
        }

        let value = Value::inspect(&Account {
            owner: "ada".to_string(),
            balance: 10,
        });

        assert_eq!(value.type_name(), "Account");
        match value {
            Value::Object(object) => assert_eq!(object.get("balance"), Some(Value::Int(10))),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("core::num::error::ParseIntError"), "ParseIntError");
        assert_eq!(short_type_name("alloc::vec::Vec<u8>"), "Vec");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
