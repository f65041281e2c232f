//! Application value graph accepted by the encoder.
//!
//! [`Value`] is a closed set of categories. Plain JSON lives next to the
//! richer categories handlers produce (model fields, query results, UUIDs,
//! enum members, temporal values...). The encoder flattens the latter into
//! the former.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
pub use rust_decimal::Decimal;
use uuid::Uuid;

use newsfeed_core::StrEnum;

/// Capability for types that control their own JSON representation.
///
/// The returned [`Value`] is encoded again, so it may contain anything the
/// encoder understands.
pub trait AsJson: fmt::Debug + Send + Sync {
    fn as_json(&self) -> Value;

    /// Name reported in encoding errors.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Arbitrary value produced by a request handler.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Integer above `i64::MAX`.
    UInt(u64),
    Float(f64),
    Str(String),
    /// Ordered sequence (list or tuple).
    List(Vec<Value>),
    /// Mapping in insertion order. Keys are converted like any other value.
    Map(Vec<(Value, Value)>),
    Field(Field),
    Object(Arc<dyn AsJson>),
    Query(LazyQuery),
    Set(ValueSet),
    Uuid(Uuid),
    Bytes(Vec<u8>),
    CallableBool(CallableBool),
    /// Request user that has not logged in.
    AnonymousUser,
    Enum(EnumMember),
    DictView(DictView),
    DateTime(DateTime<FixedOffset>),
    NaiveDateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Duration(TimeDelta),
    Decimal(Decimal),
    Opaque(Opaque),
}

impl Value {
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    pub fn object(obj: impl AsJson + 'static) -> Self {
        Value::Object(Arc::new(obj))
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    pub fn from_enum<E: StrEnum>(member: E) -> Self {
        Value::Enum(EnumMember::of(member))
    }

    pub fn opaque(type_name: impl Into<String>) -> Self {
        Value::Opaque(Opaque::new(type_name))
    }

    /// Values JSON can carry without any conversion.
    pub fn is_native(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Bool(_)
                | Value::Int(_)
                | Value::UInt(_)
                | Value::Float(_)
                | Value::Str(_)
                | Value::List(_)
                | Value::Map(_)
        )
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Field(field) => field.type_name(),
            Value::Object(obj) => obj.type_name(),
            Value::Query(q) => q.label(),
            Value::Set(_) => "set",
            Value::Uuid(_) => "uuid",
            Value::Bytes(_) => "bytes",
            Value::CallableBool(_) => "callable_bool",
            Value::AnonymousUser => "anonymous_user",
            Value::Enum(m) => m.kind(),
            Value::DictView(view) => view.type_name(),
            Value::DateTime(_) => "datetime",
            Value::NaiveDateTime(_) => "naive_datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Duration(_) => "duration",
            Value::Decimal(_) => "decimal",
            Value::Opaque(o) => o.type_name(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::AnonymousUser, Value::AnonymousUser) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Field(a), Value::Field(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Query(a), Value::Query(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::CallableBool(a), Value::CallableBool(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::DictView(a), Value::DictView(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::NaiveDateTime(a), Value::NaiveDateTime(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Value::UInt(v), Value::Int)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Field> for Value {
    fn from(v: Field) -> Self {
        Value::Field(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<CallableBool> for Value {
    fn from(v: CallableBool) -> Self {
        Value::CallableBool(v)
    }
}

impl From<LazyQuery> for Value {
    fn from(v: LazyQuery) -> Self {
        Value::Query(v)
    }
}

impl From<DictView> for Value {
    fn from(v: DictView) -> Self {
        Value::DictView(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::NaiveDateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Duration(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(u)) => Value::UInt(u),
                (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(entries) => Value::map(entries),
        }
    }
}

/// Typed wrapper for a persisted model attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Decimal(Decimal),
    Char(String),
    Integer(i64),
    /// Auto-incremented primary key.
    Auto(i64),
}

impl Field {
    fn type_name(&self) -> &'static str {
        match self {
            Field::Decimal(_) => "decimal_field",
            Field::Char(_) => "char_field",
            Field::Integer(_) => "integer_field",
            Field::Auto(_) => "auto_field",
        }
    }
}

/// Deferred query result; rows are produced when the encoder evaluates it.
#[derive(Clone)]
pub struct LazyQuery {
    label: &'static str,
    rows: Arc<dyn Fn() -> Vec<Value> + Send + Sync>,
}

impl LazyQuery {
    pub fn new(label: &'static str, rows: impl Fn() -> Vec<Value> + Send + Sync + 'static) -> Self {
        Self {
            label,
            rows: Arc::new(rows),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn evaluate(&self) -> Vec<Value> {
        (self.rows)()
    }
}

impl PartialEq for LazyQuery {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}

impl fmt::Debug for LazyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyQuery").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Unordered collection of distinct values.
///
/// Iteration order is unspecified; callers must not rely on it. Membership
/// is a linear scan, so building a set of `n` values costs O(n²); `Value`
/// holds trait objects and floats, neither of which hashes. NaN counts as
/// a single member.
#[derive(Debug, Clone, Default)]
pub struct ValueSet(Vec<Value>);

impl ValueSet {
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.iter().any(|member| same_member(member, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::default();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.0.iter().all(|v| other.contains(v))
    }
}

fn same_member(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}

/// Boolean that older call sites may still invoke like a function.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CallableBool(pub bool);

impl CallableBool {
    pub fn get(self) -> bool {
        self.0
    }
}

impl PartialEq<bool> for CallableBool {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

/// Member of a [`StrEnum`], captured by name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EnumMember {
    kind: &'static str,
    name: &'static str,
}

impl EnumMember {
    pub fn of<E: StrEnum>(member: E) -> Self {
        Self {
            kind: E::KIND,
            name: member.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Live view over a mapping's keys, values or entries.
#[derive(Debug, Clone, PartialEq)]
pub enum DictView {
    Keys(Vec<Value>),
    Values(Vec<Value>),
    Items(Vec<(Value, Value)>),
}

impl DictView {
    pub fn keys(entries: &[(Value, Value)]) -> Self {
        DictView::Keys(entries.iter().map(|(k, _)| k.clone()).collect())
    }

    pub fn values(entries: &[(Value, Value)]) -> Self {
        DictView::Values(entries.iter().map(|(_, v)| v.clone()).collect())
    }

    pub fn items(entries: &[(Value, Value)]) -> Self {
        DictView::Items(entries.to_vec())
    }

    fn type_name(&self) -> &'static str {
        match self {
            DictView::Keys(_) => "dict_keys",
            DictView::Values(_) => "dict_values",
            DictView::Items(_) => "dict_items",
        }
    }

    /// Elements in view order; entries become two-element lists.
    pub fn to_list(&self) -> Value {
        match self {
            DictView::Keys(items) | DictView::Values(items) => Value::List(items.clone()),
            DictView::Items(entries) => Value::list(
                entries
                    .iter()
                    .map(|(k, v)| Value::List(vec![k.clone(), v.clone()])),
            ),
        }
    }
}

/// Value the encoder has no rule for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    type_name: String,
}

impl Opaque {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}
