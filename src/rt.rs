//! The parsing engine.
//!
//! [`Parser`] drives a [`Tokens`] stream against the program flags, the
//! command flags and the argument spec of one command invocation.
use tracing::{debug, trace};

use crate::{
    field::{ArgSpec, Field, FlagGroup, Kind},
    value::{Parsed, Value, Values},
    Error, Result,
};

/// The remaining raw arguments, consumed from the front.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    rargs: Vec<String>,
}

impl Tokens {
    pub fn new(mut args: Vec<String>) -> Tokens {
        args.reverse();
        Tokens { rargs: args }
    }

    pub fn peek(&self) -> Option<&str> {
        self.rargs.last().map(String::as_str)
    }

    /// The next token, unless it looks like a flag.
    pub fn peek_value(&self) -> Option<&str> {
        self.peek().filter(|it| !is_flag(it))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.rargs.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.rargs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rargs.len()
    }
}

/// Whether `token` would be classified as a flag rather than a value.
pub fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Program,
    Command,
}

/// One parse of one argument list. Build a fresh parser per invocation.
pub struct Parser {
    tokens: Tokens,
    bound: usize,
}

impl Parser {
    pub fn new(args: Vec<String>) -> Parser {
        Parser { tokens: Tokens::new(args), bound: 0 }
    }

    /// Binds every token, or fails at the first bad one.
    ///
    /// On error the partially bound values are dropped with the parser.
    pub fn parse(
        mut self,
        program: &FlagGroup,
        command: &FlagGroup,
        spec: &ArgSpec,
    ) -> Result<Parsed> {
        debug!(tokens = self.tokens.len(), "parsing arguments");
        let mut parsed = Parsed {
            program: Values::new(program.fields()),
            command: Values::new(command.fields()),
            args: Values::new(spec.fields()),
        };

        while let Some(token) = self.tokens.next() {
            if let Some(name) = token.strip_prefix("--") {
                trace!(%token, "long flag");
                if name.is_empty() {
                    return Err(Error::MissingFlagName(token));
                }
                let (scope, idx, field) = resolve_long(program, command, name)
                    .ok_or_else(|| Error::UnknownFlag(token.clone()))?;
                let value = self.flag_value(field, &token)?;
                slots(&mut parsed, scope).set(idx, value);
            } else if let Some(group) = token.strip_prefix('-') {
                trace!(%token, "short flags");
                if group.is_empty() {
                    return Err(Error::MissingFlagName(token));
                }
                self.short_group(program, command, group, &mut parsed)?;
            } else {
                trace!(%token, "positional");
                self.positional(spec, token, &mut parsed.args)?;
            }
        }

        let min = spec.min_len();
        if self.bound < min {
            return Err(Error::InsufficientArgs { min, found: self.bound });
        }
        Ok(parsed)
    }

    /// `-abc`: every flag but the last must be a switch, the last one may
    /// take the following token as its value.
    fn short_group(
        &mut self,
        program: &FlagGroup,
        command: &FlagGroup,
        group: &str,
        parsed: &mut Parsed,
    ) -> Result<()> {
        let mut chars = group.chars().peekable();
        while let Some(c) = chars.next() {
            let label = format!("-{c}");
            let (scope, idx, field) =
                resolve_short(program, command, c).ok_or_else(|| Error::UnknownFlag(label.clone()))?;
            let last = chars.peek().is_none();
            if field.takes_value() && !last {
                return Err(Error::BadGroup { group: format!("-{group}"), flag: c });
            }
            let value = self.flag_value(field, &label)?;
            slots(parsed, scope).set(idx, value);
        }
        Ok(())
    }

    fn flag_value(&mut self, field: &Field, label: &str) -> Result<Value> {
        if !field.takes_value() {
            return Ok(Value::Bool(true));
        }
        if self.tokens.peek_value().is_none() {
            return Err(Error::MissingValue(label.to_string()));
        }
        let raw = self.tokens.next().ok_or_else(|| Error::MissingValue(label.to_string()))?;
        let value = Value::coerce(field, label, raw)?;
        trace!(flag = label, %value, "bound");
        Ok(value)
    }

    fn positional(&mut self, spec: &ArgSpec, token: String, args: &mut Values) -> Result<()> {
        let idx = if self.bound < spec.len() {
            self.bound
        } else if spec.sequence().is_some() {
            spec.len() - 1
        } else {
            return Err(Error::TooManyArgs(token));
        };
        let field = &spec.fields()[idx];
        if field.kind() == Kind::StrSeq {
            args.push(idx, token);
        } else {
            let value = Value::coerce(field, field.name(), token)?;
            trace!(arg = field.name(), %value, "bound");
            args.set(idx, value);
        }
        self.bound += 1;
        Ok(())
    }
}

fn slots(parsed: &mut Parsed, scope: Scope) -> &mut Values {
    match scope {
        Scope::Program => &mut parsed.program,
        Scope::Command => &mut parsed.command,
    }
}

// Program flags shadow command flags of the same name.
fn resolve_long<'g>(
    program: &'g FlagGroup,
    command: &'g FlagGroup,
    key: &str,
) -> Option<(Scope, usize, &'g Field)> {
    if let Some((idx, field)) = program.by_long(key) {
        return Some((Scope::Program, idx, field));
    }
    command.by_long(key).map(|(idx, field)| (Scope::Command, idx, field))
}

fn resolve_short<'g>(
    program: &'g FlagGroup,
    command: &'g FlagGroup,
    key: char,
) -> Option<(Scope, usize, &'g Field)> {
    if let Some((idx, field)) = program.by_short(key) {
        return Some((Scope::Program, idx, field));
    }
    command.by_short(key).map(|(idx, field)| (Scope::Command, idx, field))
}
