use std::io::{self, Read, Write};
use crate::BrainfuckError;
use crate::parser::Instruction;
use crate::tape::{Tape, DEFAULT_TAPE_SIZE};

/// Builder for the [`Interpreter`](crate::interpreter::Interpreter) struct.
pub struct InterpreterBuilder<R, W>
    where R: Read,
          W: Write
{
    tape_size: usize,
    input: Option<R>,
    output: Option<W>
}

impl<R, W> Default for InterpreterBuilder<R, W>
    where R: Read,
          W: Write
{
    fn default() -> Self {
        InterpreterBuilder::new()
    }
}

impl<R, W> InterpreterBuilder<R, W>
    where R: Read,
          W: Write
{

    /// Creates a new [`InterpreterBuilder`](crate::interpreter::InterpreterBuilder) with the default settings.
    pub fn new() -> InterpreterBuilder<R, W> {
        InterpreterBuilder {
            tape_size: DEFAULT_TAPE_SIZE,
            input: None,
            output: None
        }
    }

    /// Sets the initial tape size. The tape grows on demand past this size.
    /// Panics if the size is set to zero.
    pub fn tape_size(&mut self, tape_size: usize) -> &mut Self {
        if tape_size == 0 {
            panic!("Tape size must be at least 1.");
        }
        self.tape_size = tape_size;
        self
    }

    /// Sets the stream that will be used as input for the `,` instruction.
    pub fn input(&mut self, input: R) -> &mut Self {
        self.input = Some(input);
        self
    }

    /// Sets the stream that will be used as output for the `.` instruction.
    pub fn output(&mut self, output: W) -> &mut Self {
        self.output = Some(output);
        self
    }

    /// Builds the actual [`Interpreter`](crate::interpreter::Interpreter).
    pub fn build(&mut self) -> Interpreter<R, W> {
        Interpreter {
            tape: Tape::with_capacity(self.tape_size),
            input: self.input.take(),
            output: self.output.take()
        }
    }

}

/// Reference executor for instruction streams, optimized or not.
///
/// It runs on the same growable tape the generated C++ programs use,
/// so its observable behavior is the one the generated code must have.
pub struct Interpreter<R, W>
    where R: Read,
          W: Write
{
    tape: Tape,
    input: Option<R>,
    output: Option<W>
}

impl<R, W> Default for Interpreter<R, W>
    where R: Read,
          W: Write
{
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<R, W> Interpreter<R, W>
    where R: Read,
          W: Write
{

    /// Builds an [`Interpreter`](crate::interpreter::Interpreter) with the default settings.
    pub fn new() -> Interpreter<R, W> {
        InterpreterBuilder::new().build()
    }

    /// Creates an [`InterpreterBuilder`](crate::interpreter::InterpreterBuilder) to configure
    /// a new [`Interpreter`](crate::interpreter::Interpreter).
    pub fn builder() -> InterpreterBuilder<R, W> {
        InterpreterBuilder::new()
    }

    /// Returns a reference to the underlying tape used by this [`Interpreter`](crate::interpreter::Interpreter).
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns a reference to the input stream used by this [`Interpreter`](crate::interpreter::Interpreter).
    pub fn input(&self) -> Option<&R> {
        self.input.as_ref()
    }

    /// Returns a reference to the output stream used by this [`Interpreter`](crate::interpreter::Interpreter).
    pub fn output(&self) -> Option<&W> {
        self.output.as_ref()
    }

    /// Executes the given set of instructions in this [`Interpreter`](crate::interpreter::Interpreter).
    pub fn run(&mut self, instructions: &[Instruction]) -> Result<(), BrainfuckError> {
        let jumps = match_loops(instructions)?;

        let mut pc = 0;
        while pc < instructions.len() {
            match instructions[pc] {

                Instruction::Right { count, .. } => {
                    self.tape.move_right(count as usize);
                },

                Instruction::Left { count, .. } => {
                    self.tape.move_left(count as usize);
                },

                Instruction::Add { count, .. } => {
                    self.tape.add(count);
                },

                Instruction::Sub { count, .. } => {
                    self.tape.sub(count);
                },

                Instruction::Input { .. } => {
                    // On end of input the cell keeps its value
                    if let Some(ref mut input) = self.input {
                        if let Some(value) = read_byte(input)? {
                            self.tape.set(value);
                        }
                    }
                },

                Instruction::Output { .. } => {
                    if let Some(ref mut output) = self.output {
                        output.write_all(&[self.tape.get()])?;
                    }
                },

                Instruction::LoopStart { .. } => {
                    if self.tape.get() == 0 {
                        pc = jumps[pc];
                    }
                },

                Instruction::LoopEnd { .. } => {
                    if self.tape.get() != 0 {
                        pc = jumps[pc];
                    }
                }

            }
            pc += 1;
        }

        if let Some(ref mut output) = self.output {
            output.flush()?;
        }

        Ok(())
    }

}

/// Reads a single byte, `None` on end of input. Interrupted reads are retried.
fn read_byte(input: &mut impl Read) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e)
        }
    }
}

/// For every loop bracket, computes the index of the matching one.
/// Other instructions map to their own index.
fn match_loops(instructions: &[Instruction]) -> Result<Vec<usize>, BrainfuckError> {
    let mut jumps: Vec<usize> = (0..instructions.len()).collect();
    let mut open = Vec::new();

    for (i, instruction) in instructions.iter().enumerate() {
        match instruction {
            Instruction::LoopStart { .. } => open.push(i),
            Instruction::LoopEnd { position } => {
                let start = open.pop().ok_or(BrainfuckError::UnbalancedLoop { position: *position })?;
                jumps[start] = i;
                jumps[i] = start;
            },
            _ => {}
        }
    }

    match open.last() {
        Some(&start) => Err(BrainfuckError::UnbalancedLoop { position: instructions[start].position() }),
        None => Ok(jumps)
    }
}
