#[macro_use] extern crate log;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use clap::{App, Arg, ArgMatches};
use bf2cpp::{BrainfuckError, Generator, Interpreter, Optimizer};
use bf2cpp::parser::parse;

/// Name of the generated file when reading the program from stdin.
const STDIN_OUTPUT: &str = "brainfuck_output.cpp";

fn read_source(path: &str) -> Result<Vec<u8>, BrainfuckError> {
    let mut bytes = Vec::new();
    if path == "-" {
        debug!("Reading program from stdin.");
        io::stdin().read_to_end(&mut bytes)?;
    } else {
        debug!("Opening {}.", path);
        File::open(path)?.read_to_end(&mut bytes)?;
    }

    Ok(bytes)
}

fn output_path(input: &str, matches: &ArgMatches) -> PathBuf {
    match matches.value_of("output") {
        Some(path) => PathBuf::from(path),
        None if input == "-" => PathBuf::from(STDIN_OUTPUT),
        None => Path::new(input).with_extension("cpp")
    }
}

/// Path of the native executable built next to `output`.
///
/// Never returns the input or the generated source: a `.out` extension is used
/// when dropping the extension of `output` would collide with either of them.
fn executable_path(input: &Path, output: &Path) -> Result<PathBuf, BrainfuckError> {
    let clashes = |path: &Path| path == input || path == output;

    let executable = output.with_extension("");
    if !clashes(&executable) {
        return Ok(executable);
    }

    let executable = output.with_extension("out");
    if !clashes(&executable) {
        return Ok(executable);
    }

    Err(format!("Cannot pick an executable name that does not overwrite {} or {}", input.display(), output.display()).into())
}

fn parse_size(matches: &ArgMatches, name: &str) -> Result<usize, BrainfuckError> {
    let value = matches.value_of(name).unwrap_or_default();
    value.parse::<usize>()
        .map_err(|_| format!("Invalid value for --{}: {}", name, value).into())
}

fn tape_size(matches: &ArgMatches) -> Result<usize, BrainfuckError> {
    match parse_size(matches, "tape-size")? {
        0 => Err("Tape size must be at least 1.".into()),
        size => Ok(size)
    }
}

fn main_execute(input: &str, matches: &ArgMatches) -> Result<(), BrainfuckError> {

    let source = read_source(input)?;
    let optimizer = Optimizer::with_passes_str(matches.value_of("optimizations").unwrap_or("all"))?;
    let instructions = optimizer.run(parse(&source))?;

    let mut interpreter =
        Interpreter::builder()
        .tape_size(tape_size(matches)?)
        .input(io::stdin())
        .output(io::stdout())
        .build();

    debug!("Running program.");
    interpreter.run(&instructions)?;
    debug!("Done.");

    Ok(())

}

fn main_compile(input: &str, matches: &ArgMatches) -> Result<(), BrainfuckError> {

    let source = read_source(input)?;

    debug!("Parsing source.");
    let instructions = parse(&source);

    let optimizer = Optimizer::with_passes_str(matches.value_of("optimizations").unwrap_or("all"))?;
    let instructions = optimizer.run(instructions)?;

    let generator =
        Generator::builder()
        .indent_width(parse_size(matches, "indent")?)
        .tape_size(tape_size(matches)?)
        .build();

    // Nothing is written unless generation succeeds as a whole
    debug!("Generating C++ code.");
    let program = generator.generate(&instructions)?;

    let output = output_path(input, matches);
    if output == Path::new(input) {
        return Err(format!("Refusing to overwrite the input file {}", input).into());
    }
    program.save(&output)?;
    info!("Wrote {}.", output.display());

    let executable = executable_path(Path::new(input), &output)?;
    if matches.is_present("executable") {
        let compiler = matches.value_of("cxx").unwrap_or("c++");
        program.save_executable(&executable, compiler)?;
        println!("Successfully compiled Brainfuck to executable: {}", executable.display());
    } else {
        println!("Successfully compiled Brainfuck to C++: {}", output.display());
        println!("Compile with: c++ -O2 {} -o {}", output.display(), executable.display());
    }

    Ok(())

}

fn main() {

    // All the cli options are here
    let matches = App::new("bf2cpp")
        .version("0.1.0")
        .author("Marco Cameriero")
        .about("Translates Brainfuck programs to C++")
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to use, or - to read from stdin")
                .required(true)
                .index(1)
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Sets the output file. Defaults to the input file with a .cpp extension")
        )
        .arg(
            Arg::with_name("execute")
                .short("e")
                .long("execute")
                .conflicts_with("executable")
                .help("Executes the given Brainfuck file without generating any code")
        )
        .arg(
            Arg::with_name("executable")
                .short("x")
                .long("executable")
                .help("Also builds a native executable from the generated code")
        )
        .arg(
            Arg::with_name("cxx")
                .long("cxx")
                .takes_value(true)
                .default_value("c++")
                .help("C++ compiler used by --executable")
        )
        .arg(
            Arg::with_name("optimizations")
                .short("O")
                .long("optimizations")
                .takes_value(true)
                .default_value("all")
                .help("Specifies the optimizations to use")
        )
        .arg(
            Arg::with_name("tape-size")
                .long("tape-size")
                .takes_value(true)
                .default_value("30000")
                .help("Initial number of cells of the tape")
        )
        .arg(
            Arg::with_name("indent")
                .long("indent")
                .takes_value(true)
                .default_value("4")
                .help("Spaces per nesting level in the generated code")
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity. Repeat to increase.")
        )
        .get_matches();

    // Initialize logger as soon as possible
    let verbosity = match matches.occurrences_of("v") {
        0     => "warn",
        1     => "info",
        2     => "debug",
        3 | _ => "trace"
    };
    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or("BF2CPP_LOG", format!("bf2cpp={}", verbosity))
            .write_style_or("BF2CPP_LOG_STYLE", "auto")
    )
    .init();

    let input = matches.value_of("INPUT").unwrap_or("-");
    let res = if matches.is_present("execute") {
        main_execute(input, &matches)
    } else {
        main_compile(input, &matches)
    };

    if let Err(e) = res {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executable(input: &str, output: &str) -> Result<PathBuf, BrainfuckError> {
        executable_path(Path::new(input), Path::new(output))
    }

    #[test]
    fn test_executable_drops_extension() {
        assert_eq!(executable("prog.b", "prog.cpp").unwrap(), PathBuf::from("prog"));
        assert_eq!(executable("-", "brainfuck_output.cpp").unwrap(), PathBuf::from("brainfuck_output"));
    }

    #[test]
    fn test_executable_never_overwrites_input() {
        // `prog` -> `prog.cpp` would otherwise compile back over `prog`
        assert_eq!(executable("prog", "prog.cpp").unwrap(), PathBuf::from("prog.out"));
    }

    #[test]
    fn test_executable_never_overwrites_output() {
        assert_eq!(executable("prog.b", "out").unwrap(), PathBuf::from("out.out"));
    }

    #[test]
    fn test_executable_without_free_name() {
        match executable("x", "x.out") {
            Err(BrainfuckError::Message(_)) => {},
            r => panic!("Expected an error. Got: {:?}", r)
        }
    }
}
