pub mod template;

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use crate::BrainfuckError;
use crate::parser::{Instruction, Position};
use crate::tape::DEFAULT_TAPE_SIZE;

/// Builder for the [`Generator`](crate::codegen::Generator) struct.
pub struct GeneratorBuilder {
    indent_width: usize,
    tape_size: usize
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        GeneratorBuilder::new()
    }
}

impl GeneratorBuilder {

    /// Creates a new [`GeneratorBuilder`](crate::codegen::GeneratorBuilder) with the default settings.
    pub fn new() -> GeneratorBuilder {
        GeneratorBuilder {
            indent_width: 4,
            tape_size: DEFAULT_TAPE_SIZE
        }
    }

    /// Sets the number of spaces used for each nesting level. Zero disables indentation.
    pub fn indent_width(&mut self, indent_width: usize) -> &mut Self {
        self.indent_width = indent_width;
        self
    }

    /// Sets the initial number of cells of the tape of the generated program.
    /// Panics if the size is set to zero.
    pub fn tape_size(&mut self, tape_size: usize) -> &mut Self {
        if tape_size == 0 {
            panic!("Tape size must be at least 1.");
        }
        self.tape_size = tape_size;
        self
    }

    /// Builds the actual [`Generator`](crate::codegen::Generator).
    pub fn build(&mut self) -> Generator {
        Generator {
            indent_width: self.indent_width,
            tape_size: self.tape_size
        }
    }

}

/// Generator of C++ source code from a stream of instructions.
///
/// A generator holds no state between calls, so the same instance
/// can be used for any number of programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generator {
    indent_width: usize,
    tape_size: usize
}

impl Default for Generator {
    fn default() -> Self {
        Generator::new()
    }
}

impl Generator {

    /// Builds a [`Generator`](crate::codegen::Generator) with the default settings.
    pub fn new() -> Generator {
        GeneratorBuilder::new().build()
    }

    /// Creates a [`GeneratorBuilder`](crate::codegen::GeneratorBuilder) to configure
    /// a new [`Generator`](crate::codegen::Generator).
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    /// Generates a complete C++ program equivalent to the given instructions.
    ///
    /// Fails with [`UnbalancedLoop`](crate::BrainfuckError::UnbalancedLoop) if the loop
    /// brackets do not match, in which case no code at all is produced.
    pub fn generate(&self, instructions: &[Instruction]) -> Result<Transpiled, BrainfuckError> {
        let mut ctx = EmissionContext::new(self.indent_width);
        for instruction in instructions {
            ctx.emit_instruction(instruction)?;
        }
        let lines = ctx.finish()?;
        debug!("Generated {} statements.", lines.len());

        let mut source = template::preamble(self.tape_size);
        for line in &lines {
            source.push_str(line);
            source.push('\n');
        }
        source.push_str(template::postamble());

        Ok(Transpiled {
            source
        })
    }

}

/// Transient state of a single code generation run.
#[derive(Debug, Clone, Default)]
pub struct EmissionContext {
    indent_width: usize,
    // Positions of the currently open `[`, innermost last
    open_loops: Vec<Position>,
    lines: Vec<String>
}

impl EmissionContext {

    pub fn new(indent_width: usize) -> EmissionContext {
        EmissionContext {
            indent_width,
            open_loops: Vec::new(),
            lines: Vec::new()
        }
    }

    /// Number of loops currently open.
    pub fn depth(&self) -> usize {
        self.open_loops.len()
    }

    /// Lines emitted so far.
    pub fn lines(&self) -> &[String] {
        &*self.lines
    }

    /// Appends a statement at the current nesting depth.
    pub fn emit(&mut self, statement: &str) {
        // The body of `main()` is already one level deep
        let indent = " ".repeat(self.indent_width * (self.depth() + 1));
        self.lines.push(format!("{}{}", indent, statement));
    }

    /// Emits the opening of a loop and enters it.
    pub fn open_loop(&mut self, position: Position) {
        self.emit("while (tape.read() != 0) {");
        self.open_loops.push(position);
    }

    /// Leaves the innermost loop and emits its closing.
    pub fn close_loop(&mut self, position: Position) -> Result<(), BrainfuckError> {
        if self.open_loops.pop().is_none() {
            return Err(BrainfuckError::UnbalancedLoop { position });
        }
        self.emit("}");
        Ok(())
    }

    /// Emits the code for a single instruction.
    pub fn emit_instruction(&mut self, instruction: &Instruction) -> Result<(), BrainfuckError> {
        use Instruction::*;
        match *instruction {
            Right { count: 1, .. } => self.emit("tape.move_right();"),
            Right { count, .. } => self.emit(&format!("for (std::size_t i = 0; i < {}; ++i) tape.move_right();", count)),
            Left { count: 1, .. } => self.emit("tape.move_left();"),
            Left { count, .. } => self.emit(&format!("for (std::size_t i = 0; i < {}; ++i) tape.move_left();", count)),
            Add { count: 1, .. } => self.emit("tape.increment();"),
            Add { count, .. } => self.emit(&format!("tape.current() += {};", count)),
            Sub { count: 1, .. } => self.emit("tape.decrement();"),
            Sub { count, .. } => self.emit(&format!("tape.current() -= {};", count)),
            Output { .. } => self.emit("tape.output();"),
            Input { .. } => self.emit("tape.input();"),
            LoopStart { position } => self.open_loop(position),
            LoopEnd { position } => self.close_loop(position)?
        }
        Ok(())
    }

    /// Checks that every loop has been closed and returns the emitted lines.
    pub fn finish(self) -> Result<Vec<String>, BrainfuckError> {
        match self.open_loops.last() {
            Some(&position) => Err(BrainfuckError::UnbalancedLoop { position }),
            None => Ok(self.lines)
        }
    }

}

/// C++ source code generated from a Brainfuck program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transpiled {
    source: String
}

impl Transpiled {

    /// The generated C++ source.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// Saves the generated source to the given path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BrainfuckError> {
        fs::write(path, &self.source)?;
        Ok(())
    }

    /// Builds a native executable using the given C++ compiler.
    ///
    /// The source is first written to a temporary file, then compiled with
    /// `<compiler> -O2 <source> -o <path>`.
    pub fn save_executable<P: AsRef<Path>>(&self, path: P, compiler: &str) -> Result<(), BrainfuckError> {

        let mut file = tempfile::Builder::new()
            .prefix("bf2cpp")
            .suffix(".cpp")
            .tempfile()?;
        file.write_all(self.source.as_bytes())?;
        file.flush()?;

        debug!("Invoking {} on {}.", compiler, file.path().display());
        let status = Command::new(compiler)
            .arg("-O2")
            .arg(file.path())
            .arg("-o")
            .arg(path.as_ref())
            .status()
            .map_err(|e| format!("Cannot execute {}: {}", compiler, e))?;

        if !status.success() {
            Err(format!("{} exited with status: {}", compiler, status).into())
        } else {
            Ok(())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::optimizer::Optimizer;

    fn body(prog: &str) -> Vec<String> {
        let instructions = Optimizer::with_passes_str("all").unwrap().run(parse(prog)).unwrap();
        let mut ctx = EmissionContext::new(4);
        for i in &instructions {
            ctx.emit_instruction(i).unwrap();
        }
        ctx.finish().unwrap()
    }

    fn generate(prog: &str) -> Result<Transpiled, BrainfuckError> {
        Generator::new().generate(&parse(prog))
    }

    fn assert_unbalanced(r: Result<Transpiled, BrainfuckError>, at: usize) {
        match r {
            Err(BrainfuckError::UnbalancedLoop { position }) => assert_eq!(position, Position::at(at)),
            _ => panic!("Expected unbalanced loop error. Got: {:?}", r)
        }
    }

    #[test]
    fn test_balanced_loops() {
        assert!(generate("[]").is_ok());
        assert!(generate("[[]]").is_ok());
        assert!(generate("[+[-]]").is_ok());
        assert!(generate("[][]").is_ok());
    }

    #[test]
    fn test_unbalanced_loops() {
        assert_unbalanced(generate("]"), 0);
        assert_unbalanced(generate("["), 0);
        assert_unbalanced(generate("[[]"), 0);
        assert_unbalanced(generate("[[]][[[]]"), 4);
        assert_unbalanced(generate("[]]"), 2);
        assert_unbalanced(generate("[][ comment"), 2);
        assert_unbalanced(generate("+]["), 1);
    }

    #[test]
    fn test_empty_program() {
        let code = generate("no instructions here").unwrap();
        assert_eq!(code.source(), format!("{}{}", template::preamble(DEFAULT_TAPE_SIZE), template::postamble()));
    }

    #[test]
    fn test_unit_statements() {
        assert_eq!(body("><+-.,"), vec![
            "    tape.move_right();",
            "    tape.move_left();",
            "    tape.increment();",
            "    tape.decrement();",
            "    tape.output();",
            "    tape.input();"
        ]);
    }

    #[test]
    fn test_counted_statements() {
        assert_eq!(body(">>><<++++-----"), vec![
            "    for (std::size_t i = 0; i < 3; ++i) tape.move_right();",
            "    for (std::size_t i = 0; i < 2; ++i) tape.move_left();",
            "    tape.current() += 4;",
            "    tape.current() -= 5;"
        ]);
    }

    #[test]
    fn test_nested_indentation() {
        assert_eq!(body("[>[-]<]"), vec![
            "    while (tape.read() != 0) {",
            "        tape.move_right();",
            "        while (tape.read() != 0) {",
            "            tape.decrement();",
            "        }",
            "        tape.move_left();",
            "    }"
        ]);
    }

    #[test]
    fn test_no_indentation() {
        let code = Generator::builder().indent_width(0).build().generate(&parse("[-]")).unwrap();
        assert!(code.source().contains("\nwhile (tape.read() != 0) {\ntape.decrement();\n}\n"));
    }

    #[test]
    fn test_tape_size() {
        let code = Generator::builder().tape_size(64).build().generate(&[]).unwrap();
        assert!(code.source().contains("capacity = 64;"));
    }

    #[test]
    fn test_deterministic() {
        let prog = parse("++[>+<-]>.");
        let generator = Generator::new();
        assert_eq!(generator.generate(&prog).unwrap(), generator.generate(&prog).unwrap());
    }

    #[test]
    fn test_context_depth() {
        let mut ctx = EmissionContext::new(2);
        ctx.open_loop(Position::at(0));
        ctx.open_loop(Position::at(1));
        assert_eq!(ctx.depth(), 2);
        ctx.close_loop(Position::at(2)).unwrap();
        assert_eq!(ctx.depth(), 1);
        assert_eq!(ctx.lines().len(), 3);
        assert!(ctx.finish().is_err());
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.cpp");
        let code = generate("+.").unwrap();
        code.save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), code.source());
    }

}
