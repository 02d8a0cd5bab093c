//! Snapshot round-trips: a dumped program must load and run identically.

use pretty_assertions::assert_eq;
use rill::{CollectStringPrint, Runner};

fn output_of(runner: &Runner) -> String {
    let mut print = CollectStringPrint::new();
    runner.run(&mut print).expect("program should run cleanly");
    print.into_output()
}

fn roundtrip(source: &str) {
    let runner = Runner::new(source).expect("program should compile");
    let expected = output_of(&runner);

    let bytes = runner.dump().expect("dump should succeed");
    let restored = Runner::load(&bytes).expect("load should succeed");
    assert_eq!(output_of(&restored), expected);
}

#[test]
fn simple_program_roundtrips() {
    roundtrip("var a = 1; print a + 2; print \"text\" + \"!\";");
}

#[test]
fn resolved_locals_roundtrip() {
    // Scope distances live in a side table keyed by node id; both must
    // survive serialization together.
    roundtrip("var a = \"global\"; { var a = \"inner\"; print a; } print a;");
}

#[test]
fn functions_and_closures_roundtrip() {
    roundtrip(
        "fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; }
         var c = make();
         print c();
         print c();",
    );
}

#[test]
fn control_flow_roundtrips() {
    roundtrip("for (var i = 0; i < 3; i = i + 1) { if (i == 1) print \"one\"; else print i; }");
}

#[test]
fn a_loaded_runner_is_reusable() {
    let runner = Runner::new("print 7;").expect("program should compile");
    let bytes = runner.dump().expect("dump should succeed");
    let restored = Runner::load(&bytes).expect("load should succeed");
    assert_eq!(output_of(&restored), "7\n");
    assert_eq!(output_of(&restored), "7\n", "each run starts from fresh globals");
}

#[test]
fn garbage_bytes_fail_to_load() {
    assert!(Runner::load(&[0xff, 0x00, 0x13, 0x37]).is_err());
}
