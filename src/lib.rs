//! Declarative command line parsing.
//!
//! A program declares a set of program-wide flags and, per command, a set of
//! command flags plus positional arguments. `tflags` walks the raw argument
//! list, classifies every token, and binds it to the declared typed fields.
//!
//! ```
//! tflags::fields! {
//!     flags Global {
//!         optional -v, --verbose
//!     }
//!
//!     flags CopyFlags {
//!         optional -j, --jobs n: u64
//!     }
//!
//!     args CopyArgs {
//!         required src: String
//!         repeated dst: String
//!     }
//! }
//!
//! let args = ["-v", "a.txt", "--jobs", "4", "b.txt"].map(String::from).to_vec();
//! let (global, flags, args) = tflags::parse::<Global, CopyFlags, CopyArgs>(args).unwrap();
//! assert!(global.verbose);
//! assert_eq!(flags.jobs, Some(4));
//! assert_eq!(args.src, "a.txt");
//! assert_eq!(args.dst, vec!["b.txt".to_string()]);
//! ```
//!
//! Bad user input is always reported as an [`Error`]. Bad declarations are
//! programming errors: they fail at compile time inside [`fields!`], and as a
//! [`DeclError`] (or a panic, for the startup helpers) in the builder API.
use std::ffi::OsString;

pub use tflags_macros::fields;

pub mod canon;
mod field;
pub mod registry;
pub mod rt;
mod value;

pub use crate::{
    field::{ArgSpec, DeclError, Field, Fields, FlagGroup, Kind},
    registry::{Command, Invocation, Registry},
    value::{Parsed, Value, Values},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while binding user input.
///
/// The variants carry the offending token or field so that the caller can
/// print a precise message next to its usage text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A flag token consisting of dashes only, like `-` or `--`.
    #[error("missing flag name in `{0}`")]
    MissingFlagName(String),

    /// Neither the program flags nor the command flags know this flag.
    #[error("unknown flag: `{0}`")]
    UnknownFlag(String),

    /// A value taking short flag is not the last one of its group.
    #[error("flag `-{flag}` takes a value and must come last in `{group}`")]
    BadGroup { group: String, flag: char },

    #[error("expected a value for `{0}`")]
    MissingValue(String),

    #[error("can't parse `{field}` as {expected}: `{value}`, {reason}")]
    InvalidValue { field: String, value: String, expected: Kind, reason: String },

    #[error("expected at least {min} argument(s), got {found}")]
    InsufficientArgs { min: usize, found: usize },

    #[error("unexpected argument: `{0}`")]
    TooManyArgs(String),

    #[error("a command is required")]
    MissingCommand,

    #[error("unknown command: `{0}`")]
    UnknownCommand(String),

    #[error("argument is not valid utf8: {0:?}")]
    NotUtf8(OsString),
}

/// Parses `args` against three typed declarations at once.
///
/// `G` supplies the program-wide flags, `F` the command flags and `A` the
/// positional arguments. The argument list must not contain the executable
/// path or the command name.
///
/// # Panics
///
/// Panics if one of the declarations is invalid, see [`DeclError`].
pub fn parse<G, F, A>(args: Vec<String>) -> Result<(G, F, A)>
where
    G: Fields,
    F: Fields,
    A: Fields,
{
    let program = FlagGroup::of::<G>();
    let command = FlagGroup::of::<F>();
    let spec = ArgSpec::of::<A>();

    let parsed = rt::Parser::new(args).parse(&program, &command, &spec)?;
    Ok((
        G::from_values(parsed.program),
        F::from_values(parsed.command),
        A::from_values(parsed.args),
    ))
}
