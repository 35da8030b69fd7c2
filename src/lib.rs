//! Brainfuck to C++ transcompiler.
//!
//! The pipeline is strictly linear: [`parser::parse`] drops everything that is
//! not one of the eight Brainfuck symbols, the [`Optimizer`] collapses runs of
//! repeated instructions, and the [`Generator`] turns the result into a
//! self-contained C++ program carrying its own growable tape.
//!
//! ```
//! let code = bf2cpp::transpile("++++++++[>++++++++<-]>.", "all").unwrap();
//! assert!(code.source().contains("tape.current() += 8;"));
//! ```

#[macro_use] extern crate log;
#[macro_use] extern crate lazy_static;

pub mod codegen;
pub mod error;
pub mod interpreter;
pub mod optimizer;
pub mod parser;
pub mod tape;

pub use codegen::{Generator, Transpiled};
pub use error::BrainfuckError;
pub use interpreter::Interpreter;
pub use optimizer::Optimizer;
pub use parser::Instruction;

/// Runs the whole pipeline on the given source with the default generator settings.
/// `passes` has the same format accepted by [`Optimizer::with_passes_str`].
pub fn transpile(source: &str, passes: &str) -> Result<Transpiled, BrainfuckError> {
    let optimizer = Optimizer::with_passes_str(passes)?;
    let instructions = optimizer.run(parser::parse(source))?;
    Generator::new().generate(&instructions)
}
