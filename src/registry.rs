//! Command registry: resolves a command by name or alias and hands the rest of
//! the argument list to the parser.
//!
//! The registry never runs anything. `H` is whatever the program uses as a
//! handler, [`Registry::dispatch`] just returns the resolved command together
//! with the bound values.
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    field::{ArgSpec, Fields, FlagGroup},
    rt::{is_flag, Parser},
    value::Parsed,
    Error, Result,
};

#[derive(Debug, Clone)]
pub struct Command<H> {
    name: String,
    alias: Option<String>,
    summary: Option<String>,
    hidden: bool,
    flags: FlagGroup,
    args: ArgSpec,
    handler: H,
}

impl<H> Command<H> {
    pub fn new(name: impl Into<String>, handler: H) -> Command<H> {
        Command {
            name: name.into(),
            alias: None,
            summary: None,
            hidden: false,
            flags: FlagGroup::empty(),
            args: ArgSpec::empty(),
            handler,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Command<H> {
        self.alias = Some(alias.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Command<H> {
        self.summary = Some(summary.into());
        self
    }

    /// Keeps the command out of [`Registry::commands`]. It still dispatches.
    pub fn hidden(mut self) -> Command<H> {
        self.hidden = true;
        self
    }

    pub fn flags(mut self, flags: FlagGroup) -> Command<H> {
        self.flags = flags;
        self
    }

    pub fn args(mut self, args: ArgSpec) -> Command<H> {
        self.args = args;
        self
    }

    /// Takes flags and arguments from two typed declarations.
    ///
    /// # Panics
    ///
    /// Panics if either declaration is invalid.
    pub fn typed<F: Fields, A: Fields>(self) -> Command<H> {
        self.flags(FlagGroup::of::<F>()).args(ArgSpec::of::<A>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn flag_group(&self) -> &FlagGroup {
        &self.flags
    }

    pub fn arg_spec(&self) -> &ArgSpec {
        &self.args
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// A resolved command and the values bound for it.
pub struct Invocation<'r, H> {
    pub command: &'r Command<H>,
    pub parsed: Parsed,
}

impl<H> Invocation<'_, H> {
    pub fn handler(&self) -> &H {
        self.command.handler()
    }
}

pub struct Registry<H> {
    name: String,
    flags: FlagGroup,
    commands: Vec<Command<H>>,
    lookup: HashMap<String, usize>,
}

impl<H> Registry<H> {
    pub fn new(name: impl Into<String>, flags: FlagGroup) -> Registry<H> {
        Registry { name: name.into(), flags, commands: Vec::new(), lookup: HashMap::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> &FlagGroup {
        &self.flags
    }

    /// # Panics
    ///
    /// Panics if the name or the alias is empty, looks like a flag, or is
    /// already taken.
    pub fn register(&mut self, command: Command<H>) -> &mut Registry<H> {
        let keys = std::iter::once(command.name.clone())
            .chain(command.alias.clone())
            .collect::<Vec<_>>();
        for (i, key) in keys.iter().enumerate() {
            if key.is_empty() || is_flag(key) {
                panic!("invalid command name for `{}`: `{key}`", command.name);
            }
            if keys[..i].contains(key) {
                panic!("`{key}` is both the name and the alias of `{}`", command.name);
            }
            if let Some(&prev) = self.lookup.get(key) {
                panic!("`{key}` is already registered by `{}`", self.commands[prev].name);
            }
        }

        // Program flags win at parse time, so these are unreachable.
        for field in command.flags.fields() {
            let shadowed = field.long_key().and_then(|it| self.flags.by_long(it)).is_some()
                || field.short_key().and_then(|it| self.flags.by_short(it)).is_some();
            if shadowed {
                warn!(
                    command = %command.name,
                    flag = %field.flag_label(),
                    "command flag is shadowed by a program flag"
                );
            }
        }

        let idx = self.commands.len();
        for key in keys {
            self.lookup.insert(key, idx);
        }
        self.commands.push(command);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&Command<H>> {
        self.lookup.get(name).map(|&idx| &self.commands[idx])
    }

    /// Visible commands, sorted by name.
    pub fn commands(&self) -> Vec<&Command<H>> {
        let mut res = self.commands.iter().filter(|it| !it.hidden).collect::<Vec<_>>();
        res.sort_by(|a, b| a.name.cmp(&b.name));
        res
    }

    /// Resolves the command in `args` (which excludes the executable path)
    /// and parses everything else. Program flags may come before the
    /// command name.
    pub fn dispatch(&self, mut args: Vec<String>) -> Result<Invocation<'_, H>> {
        let idx = self.command_position(&args).ok_or(Error::MissingCommand)?;
        let name = args.remove(idx);
        let command = self.resolve(&name).ok_or(Error::UnknownCommand(name))?;
        debug!(program = %self.name, command = %command.name, "resolved command");

        let parsed = Parser::new(args).parse(&self.flags, &command.flags, &command.args)?;
        Ok(Invocation { command, parsed })
    }

    pub fn dispatch_env(&self) -> Result<Invocation<'_, H>> {
        let args = std::env::args_os()
            .skip(1)
            .map(|it| it.into_string().map_err(Error::NotUtf8))
            .collect::<Result<Vec<_>>>()?;
        self.dispatch(args)
    }

    fn command_position(&self, args: &[String]) -> Option<usize> {
        let mut idx = 0;
        while let Some(token) = args.get(idx) {
            if !is_flag(token) {
                return Some(idx);
            }
            let skip_value = self.takes_value(token)
                && args.get(idx + 1).map_or(false, |it| !is_flag(it));
            idx += if skip_value { 2 } else { 1 };
        }
        None
    }

    fn takes_value(&self, token: &str) -> bool {
        let field = match token.strip_prefix("--") {
            Some(long) => self.flags.by_long(long),
            None => token.chars().last().and_then(|c| self.flags.by_short(c)),
        };
        field.map_or(false, |(_, it)| it.takes_value())
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::{Field, Kind, Value};

    use super::*;

    fn registry() -> Registry<&'static str> {
        let flags = FlagGroup::new(vec![
            Field::new("debug", Kind::Bool).short("d").long("debug"),
            Field::new("output", Kind::Str).short("o").long("output"),
        ])
        .unwrap();
        let mut res = Registry::new("demo", flags);
        res.register(
            Command::new("example", "example")
                .alias("ex")
                .summary("Example command for testing")
                .flags(
                    FlagGroup::new(vec![
                        Field::new("boop", Kind::Bool).short("b").long("boop"),
                        Field::new("bop", Kind::Bool).long("bop"),
                    ])
                    .unwrap(),
                )
                .args(ArgSpec::new(vec![Field::new("args", Kind::StrSeq).allow_empty()]).unwrap()),
        )
        .register(Command::new("hidden", "hidden").alias("hi").hidden())
        .register(
            Command::new("copy", "copy")
                .args(ArgSpec::new(vec![Field::new("src", Kind::Str), Field::new("dst", Kind::Str)]).unwrap()),
        );
        res
    }

    fn args(text: &str) -> Vec<String> {
        text.split_ascii_whitespace().map(String::from).collect()
    }

    #[test]
    fn dispatch_by_name_and_alias() {
        let registry = registry();

        let inv = registry.dispatch(args("example -b 1 2")).unwrap();
        assert_eq!(*inv.handler(), "example");
        assert_eq!(inv.parsed.command.get_named("boop"), Some(&Value::Bool(true)));
        assert_eq!(
            inv.parsed.args.get_named("args"),
            Some(&Value::Seq(vec!["1".into(), "2".into()]))
        );

        let inv = registry.dispatch(args("ex --bop")).unwrap();
        assert_eq!(inv.command.name(), "example");
        assert_eq!(inv.parsed.args.get(0), None);

        let inv = registry.dispatch(args("hi")).unwrap();
        assert_eq!(*inv.handler(), "hidden");
    }

    #[test]
    fn program_flags_before_command() {
        let registry = registry();

        let inv = registry.dispatch(args("-o out -d copy a b")).unwrap();
        assert_eq!(inv.command.name(), "copy");
        assert_eq!(inv.parsed.program.get_named("output"), Some(&Value::Str("out".into())));
        assert_eq!(inv.parsed.program.get_named("debug"), Some(&Value::Bool(true)));

        let inv = registry.dispatch(args("--output out copy a b")).unwrap();
        assert_eq!(inv.parsed.args.get_named("dst"), Some(&Value::Str("b".into())));

        let inv = registry.dispatch(args("-do out copy a b")).unwrap();
        assert_eq!(inv.parsed.args.get_named("src"), Some(&Value::Str("a".into())));
    }

    #[test]
    fn dispatch_errors() {
        let registry = registry();
        let err = |text: &str| registry.dispatch(args(text)).err().unwrap().to_string();

        expect!["a command is required"].assert_eq(&err(""));
        expect!["a command is required"].assert_eq(&err("-d -o copy"));
        expect!["unknown command: `paste`"].assert_eq(&err("paste a b"));
        expect!["expected at least 2 argument(s), got 1"].assert_eq(&err("copy a"));
        expect!["unknown flag: `--boop`"].assert_eq(&err("copy --boop a b"));
    }

    #[test]
    fn visible_commands_are_sorted() {
        let registry = registry();
        let names = registry.commands().iter().map(|it| it.name()).collect::<Vec<_>>();
        assert_eq!(names, ["copy", "example"]);
        assert_eq!(registry.resolve("ex").and_then(|it| it.summary_text()), Some("Example command for testing"));
    }

    #[test]
    #[should_panic(expected = "`ex` is already registered by `example`")]
    fn alias_collision() {
        registry().register(Command::new("exit", "exit").alias("ex"));
    }
}
