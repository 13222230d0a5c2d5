use std::{fmt, str::FromStr};

use crate::{field::Field, Error, Kind, Result};

/// A raw token coerced into the kind of its field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Seq(Vec<String>),
}

impl Value {
    /// Converts `raw` according to `field`'s kind. `label` names the field in
    /// errors, the way the user spelled it.
    ///
    /// Sequences are not handled here, see [`Values::push`].
    pub(crate) fn coerce(field: &Field, label: &str, raw: String) -> Result<Value> {
        let value = match field.kind() {
            Kind::Bool => Value::Bool(true),
            Kind::Str => Value::Str(raw),
            Kind::Int => Value::Int(from_str(field, label, raw)?),
            Kind::Uint => Value::Uint(from_str(field, label, raw)?),
            Kind::Float => Value::Float(from_str(field, label, raw)?),
            Kind::StrSeq => Value::Seq(vec![raw]),
        };
        Ok(value)
    }
}

fn from_str<T: FromStr>(field: &Field, label: &str, raw: String) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|err| Error::InvalidValue {
        field: label.to_string(),
        expected: field.kind(),
        reason: err.to_string(),
        value: raw,
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(it) => it.fmt(f),
            Value::Str(it) => it.fmt(f),
            Value::Int(it) => it.fmt(f),
            Value::Uint(it) => it.fmt(f),
            Value::Float(it) => it.fmt(f),
            Value::Seq(it) => f.write_str(&it.join(" ")),
        }
    }
}

/// Bound slots of one flag group or argument spec, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Values {
    names: Vec<String>,
    slots: Vec<Option<Value>>,
}

impl Values {
    pub fn new(fields: &[Field]) -> Values {
        Values {
            names: fields.iter().map(|it| it.name().to_string()).collect(),
            slots: vec![None; fields.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub fn get_named(&self, name: &str) -> Option<&Value> {
        let idx = self.names.iter().position(|it| it == name)?;
        self.get(idx)
    }

    /// Iterates over `(name, value)` of the bound slots.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.names
            .iter()
            .zip(&self.slots)
            .filter_map(|(name, slot)| slot.as_ref().map(|value| (name.as_str(), value)))
    }

    /// Overwrites a scalar slot, the last occurrence of a flag wins.
    pub(crate) fn set(&mut self, idx: usize, value: Value) {
        self.slots[idx] = Some(value);
    }

    /// Appends to a sequence slot. Sequences are never reset within a parse.
    pub(crate) fn push(&mut self, idx: usize, token: String) {
        match &mut self.slots[idx] {
            Some(Value::Seq(seq)) => seq.push(token),
            slot => *slot = Some(Value::Seq(vec![token])),
        }
    }

    fn take(&mut self, idx: usize) -> Option<Value> {
        self.slots.get_mut(idx).and_then(Option::take)
    }

    pub fn take_bool(&mut self, idx: usize) -> bool {
        matches!(self.take(idx), Some(Value::Bool(true)))
    }

    pub fn take_str(&mut self, idx: usize) -> Option<String> {
        match self.take(idx)? {
            Value::Str(it) => Some(it),
            _ => None,
        }
    }

    pub fn take_int(&mut self, idx: usize) -> Option<i64> {
        match self.take(idx)? {
            Value::Int(it) => Some(it),
            _ => None,
        }
    }

    pub fn take_uint(&mut self, idx: usize) -> Option<u64> {
        match self.take(idx)? {
            Value::Uint(it) => Some(it),
            _ => None,
        }
    }

    pub fn take_float(&mut self, idx: usize) -> Option<f64> {
        match self.take(idx)? {
            Value::Float(it) => Some(it),
            _ => None,
        }
    }

    pub fn take_seq(&mut self, idx: usize) -> Vec<String> {
        match self.take(idx) {
            Some(Value::Seq(it)) => it,
            _ => Vec::new(),
        }
    }
}

/// The result of one parse: values for the program flags, the command flags
/// and the positional arguments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed {
    pub program: Values,
    pub command: Values,
    pub args: Values,
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn coerce() {
        let n = Field::new("n", Kind::Int).short("n");
        assert_eq!(Value::coerce(&n, "-n", "42".into()), Ok(Value::Int(42)));
        assert_eq!(Value::coerce(&n, "-n", "+7".into()), Ok(Value::Int(7)));

        let err = Value::coerce(&n, "-n", "abc".into()).unwrap_err();
        expect!["can't parse `-n` as int: `abc`, invalid digit found in string"]
            .assert_eq(&err.to_string());

        let u = Field::new("count", Kind::Uint);
        let err = Value::coerce(&u, "count", "1.5".into()).unwrap_err();
        expect!["can't parse `count` as uint: `1.5`, invalid digit found in string"]
            .assert_eq(&err.to_string());

        let x = Field::new("ratio", Kind::Float);
        assert_eq!(Value::coerce(&x, "ratio", "0.25".into()), Ok(Value::Float(0.25)));

        let s = Field::new("name", Kind::Str);
        assert_eq!(Value::coerce(&s, "name", "12".into()), Ok(Value::Str("12".into())));
    }

    #[test]
    fn slots() {
        let fields = [
            Field::new("debug", Kind::Bool).long("debug"),
            Field::new("out", Kind::Str).long("out"),
            Field::new("rest", Kind::StrSeq),
        ];
        let mut values = Values::new(&fields);
        values.set(0, Value::Bool(true));
        values.set(1, Value::Str("a".into()));
        values.set(1, Value::Str("b".into()));
        values.push(2, "x".into());
        values.push(2, "y".into());

        assert_eq!(values.get_named("out"), Some(&Value::Str("b".into())));
        assert_eq!(values.iter().count(), 3);
        assert!(values.take_bool(0));
        assert!(!values.take_bool(0));
        assert_eq!(values.take_str(1).as_deref(), Some("b"));
        assert_eq!(values.take_seq(2), vec!["x".to_string(), "y".to_string()]);
        assert_eq!(values.take_seq(2), Vec::<String>::new());
    }
}
