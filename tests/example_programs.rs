use std::fs;
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};
use bf2cpp::{BrainfuckError, Generator, Interpreter, Optimizer};
use bf2cpp::parser::parse;

fn run(program: &[u8], input: &[u8], expected: &[u8], passes: &str) -> Result<(), BrainfuckError> {

    // Parse the file
    let mut instructions = parse(program);

    // Optimize the instructions
    instructions = Optimizer::with_passes_str(passes)?.run(instructions)?;

    // Prepare an interpreter to run the instructions
    let mut interpreter =
        Interpreter::builder()
        .input(Cursor::new(input))
        .output(Cursor::new(Vec::new()))
        .build();

    interpreter.run(&instructions)?;

    // Check that the output of the interpreter matches the expected one
    if interpreter.output().unwrap().get_ref().as_slice() != expected {
        return Err("Mismatching output".into());
    }

    Ok(())

}

fn run_compiled(program: &[u8], input: &[u8], expected: &[u8]) -> Result<(), BrainfuckError> {

    let instructions = Optimizer::with_passes_str("all")?.run(parse(program))?;

    // Build the generated code to a temporary location
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("program");
    Generator::new()
        .generate(&instructions)?
        .save_executable(&path, "c++")?;

    // Run the compiled program
    let mut child = Command::new(&path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    child.stdin.as_mut().unwrap().write_all(input)?;
    let output = child.wait_with_output()?;

    if !output.status.success() {
        return Err(format!("Child process exited with status: {}", output.status).into());
    }
    if output.stdout.as_slice() != expected {
        return Err("Mismatching output".into());
    }

    Ok(())

}

// A test for each program

macro_rules! test_program {
    ($name:ident) => {
        paste::item! {
            #[test]
            fn [<test_ $name>]() {
                let program = include_bytes!(concat!("./programs/", stringify!($name), ".b"));
                let input = include_bytes!(concat!("./programs/", stringify!($name), ".b.in"));
                let output = include_bytes!(concat!("./programs/", stringify!($name), ".b.out"));
                run(program, input, output, "all").unwrap();
            }

            #[test]
            fn [<test_ $name _unoptimized>]() {
                let program = include_bytes!(concat!("./programs/", stringify!($name), ".b"));
                let input = include_bytes!(concat!("./programs/", stringify!($name), ".b.in"));
                let output = include_bytes!(concat!("./programs/", stringify!($name), ".b.out"));
                run(program, input, output, "none").unwrap();
            }

            #[test]
            #[ignore] // needs a C++ compiler in $PATH
            fn [<test_ $name _compiled>]() {
                let program = include_bytes!(concat!("./programs/", stringify!($name), ".b"));
                let input = include_bytes!(concat!("./programs/", stringify!($name), ".b.in"));
                let output = include_bytes!(concat!("./programs/", stringify!($name), ".b.out"));
                run_compiled(program, input, output).unwrap();
            }
        }
    };
}

test_program!(hello_world);
test_program!(at_sign);
test_program!(ibm);
test_program!(seven);
test_program!(wrap);

#[test]
fn test_every_program_generates() {
    let pattern = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/programs/*.b");
    let mut count = 0;

    for entry in glob::glob(pattern).unwrap() {
        let path = entry.unwrap();
        let source = fs::read_to_string(&path).unwrap();
        let code = bf2cpp::transpile(&source, "all")
            .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));

        let text = code.source();
        assert_eq!(text.matches('{').count(), text.matches('}').count(), "{}", path.display());
        count += 1;
    }

    assert!(count >= 5);
}
