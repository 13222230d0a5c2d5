mod empty;
mod smoke;
mod variadic;

use std::fmt;

use expect_test::{expect, Expect};
use tflags::{Command, Fields, FlagGroup, Parsed, Registry};

fn check<G, F, A>(args: &str, expect: Expect)
where
    G: Fields + fmt::Debug,
    F: Fields + fmt::Debug,
    A: Fields + fmt::Debug,
{
    let args = args.split_ascii_whitespace().map(String::from).collect::<Vec<_>>();
    match tflags::parse::<G, F, A>(args) {
        Ok(res) => expect.assert_debug_eq(&res),
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

#[test]
fn empty() {
    check::<empty::Empty, empty::Empty, empty::Nothing>(
        "",
        expect![[r#"
            (
                Empty,
                Empty,
                Nothing,
            )
        "#]],
    );
    check::<empty::Empty, empty::Empty, empty::Nothing>("x", expect!["unexpected argument: `x`"]);
    check::<empty::Empty, empty::Empty, empty::Nothing>("-x", expect!["unknown flag: `-x`"]);
}

#[test]
fn smoke() {
    check::<smoke::Global, smoke::Build, smoke::BuildArgs>(
        "-dv --jobs 4 x86 2",
        expect![[r#"
            (
                Global {
                    debug: true,
                    no_color: false,
                    yes_all: false,
                    verbose: true,
                },
                Build {
                    jobs: Some(
                        4,
                    ),
                    out_dir: None,
                    opt_level: None,
                    ratio: None,
                },
                BuildArgs {
                    target: "x86",
                    times: 2,
                },
            )
        "#]],
    );
    check::<smoke::Global, smoke::Build, smoke::BuildArgs>(
        "-N --ratio 0.5 a --opt-level 3 -o target/out 1",
        expect![[r#"
            (
                Global {
                    debug: false,
                    no_color: true,
                    yes_all: false,
                    verbose: false,
                },
                Build {
                    jobs: None,
                    out_dir: Some(
                        "target/out",
                    ),
                    opt_level: Some(
                        3,
                    ),
                    ratio: Some(
                        0.5,
                    ),
                },
                BuildArgs {
                    target: "a",
                    times: 1,
                },
            )
        "#]],
    );
}

#[test]
fn smoke_errors() {
    type G = smoke::Global;
    type F = smoke::Build;
    type A = smoke::BuildArgs;

    check::<G, F, A>("-vj 4", expect!["expected at least 2 argument(s), got 0"]);
    check::<G, F, A>("-jv 4 a 1", expect!["flag `-j` takes a value and must come last in `-jv`"]);
    check::<G, F, A>(
        "--jobs x a 1",
        expect!["can't parse `--jobs` as uint: `x`, invalid digit found in string"],
    );
    check::<G, F, A>("--jobs", expect!["expected a value for `--jobs`"]);
    check::<G, F, A>("a 1 b", expect!["unexpected argument: `b`"]);
    check::<G, F, A>("a -1", expect!["unknown flag: `-1`"]);
    check::<G, F, A>(
        "a x",
        expect!["can't parse `times` as uint: `x`, invalid digit found in string"],
    );
    check::<G, F, A>("--werbose", expect!["unknown flag: `--werbose`"]);
}

#[test]
fn variadic() {
    check::<(), variadic::ExampleFlags, variadic::ExampleArgs>(
        "",
        expect![[r#"
            (
                (),
                ExampleFlags {
                    boop: false,
                    bop: false,
                },
                ExampleArgs {
                    args: [],
                },
            )
        "#]],
    );
    check::<(), variadic::ExampleFlags, variadic::ExampleArgs>(
        "-b 1 2 3 --bop",
        expect![[r#"
            (
                (),
                ExampleFlags {
                    boop: true,
                    bop: true,
                },
                ExampleArgs {
                    args: [
                        "1",
                        "2",
                        "3",
                    ],
                },
            )
        "#]],
    );

    check::<(), (), variadic::Files>("", expect!["expected at least 2 argument(s), got 0"]);
    check::<(), (), variadic::Files>("a", expect!["expected at least 2 argument(s), got 1"]);
    check::<(), (), variadic::Files>(
        "a b c",
        expect![[r#"
            (
                (),
                (),
                Files {
                    first: "a",
                    files: [
                        "b",
                        "c",
                    ],
                },
            )
        "#]],
    );
}

#[test]
fn descriptors() {
    let fields = smoke::Build::fields();
    let keys = fields
        .iter()
        .map(|it| format!("{} {:?} {:?} {}\n", it.name(), it.short_key(), it.long_key(), it.kind()))
        .collect::<String>();
    expect![[r#"
        jobs Some('j') Some("jobs") uint
        out_dir Some('o') Some("out-dir") string
        opt_level None Some("opt-level") int
        ratio None Some("ratio") float
    "#]]
    .assert_eq(&keys);
    assert_eq!(fields[0].doc_text(), Some("Number of parallel jobs."));

    let spec = tflags::ArgSpec::of::<variadic::ExampleArgs>();
    assert_eq!((spec.min_len(), spec.max_len()), (0, None));
    let spec = tflags::ArgSpec::of::<variadic::Files>();
    assert_eq!((spec.min_len(), spec.max_len()), (2, None));
}

#[test]
fn registry() {
    type Handler = fn(Parsed) -> String;

    fn example(parsed: Parsed) -> String {
        let flags = variadic::ExampleFlags::from_values(parsed.command);
        let args = variadic::ExampleArgs::from_values(parsed.args);
        format!("boop={} bop={} args={:?}", flags.boop, flags.bop, args.args)
    }

    fn build(parsed: Parsed) -> String {
        let global = smoke::Global::from_values(parsed.program);
        let args = smoke::BuildArgs::from_values(parsed.args);
        format!("debug={} target={} times={}", global.debug, args.target, args.times)
    }

    let mut registry = Registry::<Handler>::new("demo", FlagGroup::of::<smoke::Global>());
    registry
        .register(
            Command::new("example", example as Handler)
                .alias("ex")
                .typed::<variadic::ExampleFlags, variadic::ExampleArgs>(),
        )
        .register(Command::new("build", build as Handler).typed::<smoke::Build, smoke::BuildArgs>());

    let run = |args: &str| {
        let args = args.split_ascii_whitespace().map(String::from).collect();
        match registry.dispatch(args) {
            Ok(inv) => {
                let handler = *inv.handler();
                handler(inv.parsed)
            }
            Err(err) => err.to_string(),
        }
    };

    expect![[r#"boop=true bop=false args=["4", "5"]"#]].assert_eq(&run("-d ex -b 4 5"));
    expect!["debug=true target=x86 times=3"].assert_eq(&run("build --debug -j 2 x86 3"));
    expect!["unknown command: `test`"].assert_eq(&run("-v test"));
    expect!["unknown flag: `--boop`"].assert_eq(&run("build --boop x86 3"));
}
