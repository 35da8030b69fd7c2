use itertools::Itertools;
use crate::BrainfuckError;
use crate::parser::Instruction;
use crate::optimizer::Pass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseRuns;

impl Pass for CollapseRuns {

    fn name(&self) -> &str {
        "collapse-runs"
    }

    fn run(&self, instructions: Vec<Instruction>) -> Result<Vec<Instruction>, BrainfuckError> {
        let mut collapsed = Vec::with_capacity(instructions.len());

        // Group together maximal runs of the same symbol
        let runs = instructions.into_iter().group_by(Instruction::symbol);
        for (_, run) in &runs {
            let mut run = run.peekable();

            // Loops and I/O are never merged, even when adjacent
            if !run.peek().map_or(false, |i| i.is_repeatable()) {
                collapsed.extend(run);
                continue;
            }

            if let Some(merged) = run.map(Ok::<_, BrainfuckError>).fold1(|acc, next| merge(acc?, next?)) {
                collapsed.push(merged?);
            }
        }

        Ok(collapsed)
    }

}

/// Merges two instructions of the same repeatable kind into a single one.
fn merge(a: Instruction, b: Instruction) -> Result<Instruction, BrainfuckError> {
    use Instruction::*;

    let symbol = a.symbol();
    let position = a.position().merge(b.position());
    let count = a.count().checked_add(b.count())
        .ok_or(BrainfuckError::RunLengthOverflow { symbol, position })?;

    match (a, b) {
        (Right { .. }, Right { .. }) => Ok(Right { count, position }),
        (Left { .. }, Left { .. }) => Ok(Left { count, position }),
        (Add { .. }, Add { .. }) => Ok(Add { count, position }),
        (Sub { .. }, Sub { .. }) => Ok(Sub { count, position }),
        (a, b) => Err(format!("Cannot merge '{}' with '{}'", a.symbol(), b.symbol()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Position};

    fn p(s: &str) -> Vec<Instruction> {
        CollapseRuns.run(parse(s)).unwrap()
    }

    #[test]
    fn test_single_run() {
        assert_eq!(p("+++++"), vec![
            Instruction::Add { count: 5, position: Position { start: 0, end: 4 } }
        ]);
    }

    #[test]
    fn test_alternating_symbols_are_not_merged() {
        let out = p("+-+-");
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|i| i.count() == 1));
    }

    #[test]
    fn test_every_repeatable_kind() {
        let out = p(">>><<++++---");
        let summary: Vec<(char, u32)> = out.iter().map(|i| (i.symbol(), i.count())).collect();
        assert_eq!(summary, vec![('>', 3), ('<', 2), ('+', 4), ('-', 3)]);
    }

    #[test]
    fn test_loops_and_io_pass_through() {
        let out = p("[[..,,]]");
        let symbols: String = out.iter().map(Instruction::symbol).collect();
        assert_eq!(symbols, "[[..,,]]");
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn test_runs_span_comments() {
        // Comments are already gone after parsing, so the run continues
        let out = p("++ two more ++");
        assert_eq!(out, vec![
            Instruction::Add { count: 4, position: Position { start: 0, end: 13 } }
        ]);
    }

    #[test]
    fn test_runs_stop_at_loops() {
        let out = p("++[++]++");
        let summary: Vec<(char, u32)> = out.iter().map(|i| (i.symbol(), i.count())).collect();
        assert_eq!(summary, vec![('+', 2), ('[', 1), ('+', 2), (']', 1), ('+', 2)]);
    }

    #[test]
    fn test_idempotent() {
        let once = p("+++>>>[-]<<<...");
        assert_eq!(CollapseRuns.run(once.clone()).unwrap(), once);
    }

    #[test]
    fn test_empty() {
        assert_eq!(p(""), vec![]);
    }

    #[test]
    fn test_overflow() {
        let prog = vec![
            Instruction::Add { count: u32::max_value(), position: Position { start: 0, end: 9 } },
            Instruction::Add { count: 1, position: Position::at(10) }
        ];
        match CollapseRuns.run(prog) {
            Err(BrainfuckError::RunLengthOverflow { symbol: '+', position }) => {
                assert_eq!(position, Position { start: 0, end: 10 });
            },
            r => panic!("Expected run length overflow. Got: {:?}", r)
        }
    }

}
