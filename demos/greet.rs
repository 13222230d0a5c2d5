//! A small multi-command program.
//!
//! ```text
//! $ RUST_LOG=tflags=trace cargo run --example greet -- -d hello -e -t 2 world
//! ```
use std::{mem, process};

use tflags::{Command, FlagGroup, Parsed, Registry};
use tracing_subscriber::EnvFilter;

mod flags {
    tflags::fields! {
        /// Program-wide flags.
        flags Global {
            /// Show debugging information
            optional -d, --debug
            /// Assume yes in all yes/no queries
            optional -y, --yes-all
        }

        flags HelloFlags {
            optional -e, --emoji
            /// Repeat the greeting.
            optional -t, --times n: u64
        }

        args HelloArgs {
            required name: String
        }

        flags ExampleFlags {
            /// You saw nothing
            optional -b, --boop
            /// Ouch!
            optional --bop
        }

        args ExampleArgs {
            repeated numbers: String
        }
    }
}

type Handler = fn(&flags::Global, Parsed) -> Result<(), String>;

fn hello(global: &flags::Global, parsed: Parsed) -> Result<(), String> {
    use tflags::Fields;

    let flags = flags::HelloFlags::from_values(parsed.command);
    let args = flags::HelloArgs::from_values(parsed.args);
    if global.debug {
        eprintln!("{flags:?} {args:?}");
    }
    let bang = if flags.emoji { "❣️" } else { "!" };
    for _ in 0..flags.times.unwrap_or(1) {
        println!("Hello {}{}", args.name, bang);
    }
    Ok(())
}

fn example(_global: &flags::Global, parsed: Parsed) -> Result<(), String> {
    use tflags::Fields;

    let flags = flags::ExampleFlags::from_values(parsed.command);
    let args = flags::ExampleArgs::from_values(parsed.args);
    if flags.boop {
        println!("You got booped!!!");
    }
    if flags.bop {
        println!("Stop hitting yourself!!!");
    }
    if args.numbers.is_empty() {
        return Err("You get nothing!!!".to_string());
    }
    for arg in &args.numbers {
        let n = arg.parse::<u8>().map_err(|err| format!("`{arg}` is not a small number: {err}"))?;
        println!("You get a '{n}'!!!!!!");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut registry = Registry::<Handler>::new("greet", FlagGroup::of::<flags::Global>());
    registry
        .register(
            Command::new("hello", hello as Handler)
                .alias("hi")
                .summary("Say hello")
                .typed::<flags::HelloFlags, flags::HelloArgs>(),
        )
        .register(
            Command::new("example", example as Handler)
                .alias("ex")
                .summary("Example command for testing")
                .typed::<flags::ExampleFlags, flags::ExampleArgs>(),
        );

    let mut inv = match registry.dispatch_env() {
        Ok(it) => it,
        Err(err) => {
            eprintln!("{err}");
            let names = registry.commands().iter().map(|it| it.name()).collect::<Vec<_>>();
            eprintln!("commands: {}", names.join(", "));
            process::exit(1)
        }
    };

    let global = <flags::Global as tflags::Fields>::from_values(mem::take(&mut inv.parsed.program));
    let handler = *inv.handler();
    if let Err(err) = handler(&global, inv.parsed) {
        eprintln!("{err}");
        process::exit(1)
    }
}
