//! Canonical re-serialization of bound values.
//!
//! Flags come first, spelled with their long key when they have one, followed
//! by the positional values in order. Feeding the result back to the parser
//! binds the same values again.
use crate::{
    field::{ArgSpec, FlagGroup},
    value::{Parsed, Value, Values},
};

pub fn to_args(
    program: &FlagGroup,
    command: &FlagGroup,
    spec: &ArgSpec,
    parsed: &Parsed,
) -> Vec<String> {
    let mut res = Vec::new();
    flags(&mut res, program, &parsed.program);
    flags(&mut res, command, &parsed.command);
    for idx in 0..spec.len() {
        match parsed.args.get(idx) {
            Some(Value::Seq(seq)) => res.extend(seq.iter().cloned()),
            Some(value) => res.push(value.to_string()),
            None => (),
        }
    }
    res
}

fn flags(buf: &mut Vec<String>, group: &FlagGroup, values: &Values) {
    for (idx, field) in group.fields().iter().enumerate() {
        match values.get(idx) {
            None | Some(Value::Bool(false)) => (),
            Some(Value::Bool(true)) => buf.push(field.flag_label()),
            Some(value) => {
                buf.push(field.flag_label());
                buf.push(value.to_string());
            }
        }
    }
}
