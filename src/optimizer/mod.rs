pub mod passes;

use std::collections::HashMap;
use std::sync::Arc;
use crate::BrainfuckError;
use crate::parser::Instruction;

/// An optimization pass.
pub trait Pass {

    /// Name of the pass.
    fn name(&self) -> &str;

    /// Executes the pass on the given set of instructions.
    /// Returns the new set of optimized instructions.
    fn run(&self, instructions: Vec<Instruction>) -> Result<Vec<Instruction>, BrainfuckError>;

}

/// Brainfuck instruction stream optimizer.
pub struct Optimizer {
    passes: Vec<Arc<dyn Pass + Sync + Send>>
}

impl Optimizer {

    /// Constructs a new optimizer with the given set of passes.
    pub fn with_passes(passes: Vec<Arc<dyn Pass + Sync + Send>>) -> Optimizer {
        Optimizer {
            passes
        }
    }

    /// Constructs a new optimizer with the given set of passes.
    /// The passes are specified as a comma-separated string of names
    pub fn with_passes_str(s: &str) -> Result<Optimizer, BrainfuckError> {

        let mut passes = Vec::new();

        match s {
            "none" => {
                // Do nothing, the vector of passes will be empty
            },
            "all" => {
                passes.extend(DEFAULT_OPTIMIZATION_PASSES.iter().cloned());
            },
            _ => {
                // Each pass is separated by `,`
                for name in s.split(',') {
                    if let Some(arc) = ALL_OPTIMIZATIONS.get(name.trim()) {
                        passes.push(Arc::clone(arc));
                    } else {
                        return Err(BrainfuckError::UnknownOptimizationPass(name.to_owned()));
                    }
                }
            }
        }

        Ok(Optimizer {
            passes
        })
    }

    /// Returns a slice containing the passes configured for this optimizer.
    pub fn passes(&self) -> &[Arc<dyn Pass + Sync + Send>] {
        &*self.passes
    }

    /// Runs all the passes on the given set of instructions, in order.
    pub fn run(&self, instructions: Vec<Instruction>) -> Result<Vec<Instruction>, BrainfuckError> {
        let mut accum = instructions;
        for pass in &self.passes {
            let before = accum.len();
            accum = pass.run(accum)?;
            debug!("Pass {}: {} -> {} instructions.", pass.name(), before, accum.len());
        }
        Ok(accum)
    }

}

// Builds a static maps of all the passes
lazy_static! {

    /// [`HashMap`](std::collections::HashMap) containing all the registered optimization passes.
    pub static ref ALL_OPTIMIZATIONS: HashMap<&'static str, Arc<dyn Pass + Sync + Send>> = {
        use passes::*;
        let mut map: HashMap<_, Arc<dyn Pass + Sync + Send>> = HashMap::new();
        map.insert("collapse-runs", Arc::new(CollapseRuns));
        map
    };

    /// Order of the default optimization passes.
    pub static ref DEFAULT_OPTIMIZATION_PASSES: Vec<Arc<dyn Pass + Sync + Send>> = vec![
        Arc::clone(&ALL_OPTIMIZATIONS["collapse-runs"])
    ];

}
