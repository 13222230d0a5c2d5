//! Field descriptors and the two collections built from them: flag groups and
//! argument specs.
//!
//! Descriptions are validated once, when they are built, and are immutable
//! afterwards. A failed validation is a programming error in the declaration
//! and is reported as a [`DeclError`].
use std::{any, collections::HashSet, fmt};

use crate::value::Values;

/// Semantic type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Str,
    Int,
    Uint,
    Float,
    StrSeq,
}

impl Kind {
    /// Whether a matched flag of this kind consumes the following token.
    pub fn takes_value(self) -> bool {
        self != Kind::Bool
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Kind::Bool => "bool",
            Kind::Str => "string",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::StrSeq => "string sequence",
        };
        f.write_str(text)
    }
}

/// Metadata of one declared flag or positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    kind: Kind,
    short: Option<String>,
    long: Option<String>,
    allow_empty: bool,
    doc: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: Kind) -> Field {
        Field { name: name.into(), kind, short: None, long: None, allow_empty: false, doc: None }
    }

    /// Sets the single character key matched by `-k`.
    pub fn short(mut self, key: impl Into<String>) -> Field {
        self.short = Some(key.into());
        self
    }

    /// Sets the key matched by `--key`.
    pub fn long(mut self, key: impl Into<String>) -> Field {
        self.long = Some(key.into());
        self
    }

    /// Lets a trailing sequence argument be satisfied by zero tokens.
    pub fn allow_empty(mut self) -> Field {
        self.allow_empty = true;
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Field {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn short_key(&self) -> Option<char> {
        self.short.as_deref().and_then(|it| it.chars().next())
    }

    pub fn long_key(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn takes_value(&self) -> bool {
        self.kind.takes_value()
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The canonical spelling of a flag, preferring the long key.
    pub fn flag_label(&self) -> String {
        match (&self.long, self.short_key()) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => self.name.clone(),
        }
    }
}

/// A declaration error. These reflect mistakes in the program, not in the
/// user input, and are expected to abort startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclError {
    #[error("short key of `{field}` must be exactly one character, got `{key}`")]
    InvalidShortKey { field: String, key: String },

    #[error("long key of `{field}` must be non-empty and not start with `-`, got `{key}`")]
    InvalidLongKey { field: String, key: String },

    #[error("flag `{0}` needs a short or a long key")]
    MissingKey(String),

    #[error("duplicate short key: `-{0}`")]
    DuplicateShortKey(char),

    #[error("duplicate long key: `--{0}`")]
    DuplicateLongKey(String),

    #[error("flag `{0}` can't be a string sequence")]
    SequenceFlag(String),

    #[error("argument `{0}` can't be a bool")]
    BoolArgument(String),

    #[error("argument `{0}` is a sequence but is not the last argument")]
    SequenceNotLast(String),

    #[error("`{0}` is not a sequence and can't allow empty")]
    AllowEmptyScalar(String),
}

/// A type whose fields are described by a descriptor list.
///
/// Implemented by the structs [`fields!`](crate::fields) generates, but
/// nothing stops a hand-written impl.
pub trait Fields: Sized {
    /// The descriptor list, in declaration order.
    fn fields() -> Vec<Field>;

    /// Builds the value from slots bound against [`Fields::fields`].
    fn from_values(values: Values) -> Self;
}

impl Fields for () {
    fn fields() -> Vec<Field> {
        Vec::new()
    }

    fn from_values(_values: Values) {}
}

/// A set of named options at one scope: program-wide or per command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagGroup {
    fields: Vec<Field>,
}

impl FlagGroup {
    pub fn new(fields: Vec<Field>) -> Result<FlagGroup, DeclError> {
        let mut shorts = HashSet::new();
        let mut longs = HashSet::new();
        for field in &fields {
            if field.kind == Kind::StrSeq {
                return Err(DeclError::SequenceFlag(field.name.clone()));
            }
            if field.allow_empty {
                return Err(DeclError::AllowEmptyScalar(field.name.clone()));
            }
            if field.short.is_none() && field.long.is_none() {
                return Err(DeclError::MissingKey(field.name.clone()));
            }
            if let Some(key) = &field.short {
                let mut chars = key.chars();
                let short = match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '-' => c,
                    _ => {
                        return Err(DeclError::InvalidShortKey {
                            field: field.name.clone(),
                            key: key.clone(),
                        })
                    }
                };
                if !shorts.insert(short) {
                    return Err(DeclError::DuplicateShortKey(short));
                }
            }
            if let Some(key) = &field.long {
                if key.is_empty() || key.starts_with('-') {
                    return Err(DeclError::InvalidLongKey {
                        field: field.name.clone(),
                        key: key.clone(),
                    });
                }
                if !longs.insert(key.as_str()) {
                    return Err(DeclError::DuplicateLongKey(key.clone()));
                }
            }
        }
        Ok(FlagGroup { fields })
    }

    pub fn empty() -> FlagGroup {
        FlagGroup::default()
    }

    /// Builds the group of a typed declaration.
    ///
    /// # Panics
    ///
    /// Panics if the declaration is invalid.
    pub fn of<T: Fields>() -> FlagGroup {
        FlagGroup::new(T::fields())
            .unwrap_or_else(|err| panic!("invalid flags `{}`: {err}", any::type_name::<T>()))
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn by_long(&self, key: &str) -> Option<(usize, &Field)> {
        self.fields.iter().enumerate().find(|(_, it)| it.long.as_deref() == Some(key))
    }

    pub fn by_short(&self, key: char) -> Option<(usize, &Field)> {
        self.fields.iter().enumerate().find(|(_, it)| it.short_key() == Some(key))
    }
}

/// The positional parameters of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSpec {
    fields: Vec<Field>,
}

impl ArgSpec {
    pub fn new(fields: Vec<Field>) -> Result<ArgSpec, DeclError> {
        let last = fields.len().saturating_sub(1);
        for (idx, field) in fields.iter().enumerate() {
            match field.kind {
                Kind::Bool => return Err(DeclError::BoolArgument(field.name.clone())),
                Kind::StrSeq if idx != last => {
                    return Err(DeclError::SequenceNotLast(field.name.clone()))
                }
                Kind::StrSeq => (),
                _ if field.allow_empty => {
                    return Err(DeclError::AllowEmptyScalar(field.name.clone()))
                }
                _ => (),
            }
        }
        Ok(ArgSpec { fields })
    }

    pub fn empty() -> ArgSpec {
        ArgSpec::default()
    }

    /// Builds the spec of a typed declaration.
    ///
    /// # Panics
    ///
    /// Panics if the declaration is invalid.
    pub fn of<T: Fields>() -> ArgSpec {
        ArgSpec::new(T::fields())
            .unwrap_or_else(|err| panic!("invalid arguments `{}`: {err}", any::type_name::<T>()))
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The trailing sequence field, if any.
    pub fn sequence(&self) -> Option<&Field> {
        self.fields.last().filter(|it| it.kind == Kind::StrSeq)
    }

    /// Fewest positional tokens that satisfy the spec.
    pub fn min_len(&self) -> usize {
        match self.sequence() {
            Some(seq) if seq.allow_empty => self.len() - 1,
            _ => self.len(),
        }
    }

    /// Most positional tokens the spec accepts, `None` if unbounded.
    pub fn max_len(&self) -> Option<usize> {
        match self.sequence() {
            Some(_) => None,
            None => Some(self.len()),
        }
    }
}
