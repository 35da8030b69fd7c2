/// The eight symbols that make up a Brainfuck program.
pub const SYMBOLS: &str = "><+-.,[]";

/// Span of an instruction in the raw source text, as byte offsets (both inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub start: usize,
    pub end: usize
}

impl Position {

    /// Position of a single symbol.
    pub fn at(offset: usize) -> Position {
        Position {
            start: offset,
            end: offset
        }
    }

    /// Returns the smallest span covering both positions.
    pub fn merge(self, other: Position) -> Position {
        Position {
            start: self.start.min(other.start),
            end: self.end.max(other.end)
        }
    }

}

/// A single Brainfuck instruction.
///
/// Only the four repeatable instructions carry a `count`: loops and I/O
/// always stand for exactly one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Right { count: u32, position: Position },
    Left { count: u32, position: Position },
    Add { count: u32, position: Position },
    Sub { count: u32, position: Position },
    Output { position: Position },
    Input { position: Position },
    LoopStart { position: Position },
    LoopEnd { position: Position }
}

impl Instruction {

    /// Builds the unit instruction for the given symbol,
    /// or `None` if the character is not a Brainfuck symbol.
    pub fn from_symbol(symbol: char, offset: usize) -> Option<Instruction> {
        use Instruction::*;
        let position = Position::at(offset);
        let instruction = match symbol {
            '>' => Right { count: 1, position },
            '<' => Left { count: 1, position },
            '+' => Add { count: 1, position },
            '-' => Sub { count: 1, position },
            '.' => Output { position },
            ',' => Input { position },
            '[' => LoopStart { position },
            ']' => LoopEnd { position },
            _ => return None
        };
        Some(instruction)
    }

    /// The source symbol this instruction was produced from.
    pub fn symbol(&self) -> char {
        use Instruction::*;
        match self {
            Right { .. } => '>',
            Left { .. } => '<',
            Add { .. } => '+',
            Sub { .. } => '-',
            Output { .. } => '.',
            Input { .. } => ',',
            LoopStart { .. } => '[',
            LoopEnd { .. } => ']'
        }
    }

    /// How many times the instruction is repeated. Always 1 for loops and I/O.
    pub fn count(&self) -> u32 {
        use Instruction::*;
        match *self {
            Right { count, .. } | Left { count, .. } | Add { count, .. } | Sub { count, .. } => count,
            _ => 1
        }
    }

    /// Whether consecutive occurrences of this instruction can be collapsed into one.
    pub fn is_repeatable(&self) -> bool {
        use Instruction::*;
        match self {
            Right { .. } | Left { .. } | Add { .. } | Sub { .. } => true,
            _ => false
        }
    }

    /// Span of the source symbols this instruction stands for.
    pub fn position(&self) -> Position {
        use Instruction::*;
        match *self {
            Right { position, .. } |
            Left { position, .. } |
            Add { position, .. } |
            Sub { position, .. } |
            Output { position } |
            Input { position } |
            LoopStart { position } |
            LoopEnd { position } => position
        }
    }

}

/// Strips every character that is not one of the eight Brainfuck symbols.
pub fn filter(source: &str) -> String {
    source.chars().filter(|c| SYMBOLS.contains(*c)).collect()
}

/// Parses a Brainfuck program, one unit instruction per symbol.
///
/// The source is scanned byte by byte, so it does not need to be valid UTF-8 and
/// positions are byte offsets into it. Any other byte is commentary and is silently
/// skipped. Parsing never fails: bracket balance is checked later, when the program
/// is turned into code.
pub fn parse<S: AsRef<[u8]>>(source: S) -> Vec<Instruction> {
    source.as_ref().iter()
        .enumerate()
        .filter_map(|(offset, &b)| Instruction::from_symbol(b as char, offset))
        .collect()
}
