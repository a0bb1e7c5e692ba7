use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use heap_solver::config::{HeapCount, PRESETS};
use heap_solver::ProblemForm;

#[derive(Debug, Parser)]
#[command(
    name = "solve_heaps",
    about = "Find starting heaps that win in exactly W plies but not in L",
    after_help = "Moves: +N, -N, *N, or an expression in x such as x*2+1"
)]
struct Args {
    /// JSON file holding the problem; flags below override its fields
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Start from a built-in example problem
    #[arg(short, long, value_parser = PRESETS)]
    preset: Option<String>,

    /// Play with two heaps; the condition applies to their sum
    #[arg(long)]
    two_heaps: bool,

    /// Allowed move, repeat for several
    #[arg(short, long = "move", allow_hyphen_values = true)]
    moves: Vec<String>,

    /// Win condition operator: >=, ==, >, <, <=
    #[arg(long)]
    condition: Option<String>,

    /// Win condition threshold
    #[arg(long, allow_hyphen_values = true)]
    win_value: Option<String>,

    /// First starting value to try
    #[arg(long, allow_hyphen_values = true)]
    start: Option<String>,

    /// Last starting value to try (inclusive)
    #[arg(long, allow_hyphen_values = true)]
    end: Option<String>,

    /// Plies within which the win must be forceable
    #[arg(long, allow_hyphen_values = true)]
    win_steps: Option<String>,

    /// Plies within which the win must not be forceable
    #[arg(long, allow_hyphen_values = true)]
    lose_steps: Option<String>,

    /// Fixed value of the second heap
    #[arg(long, allow_hyphen_values = true)]
    heap2: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log the sweep at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn form(&self) -> anyhow::Result<ProblemForm> {
        let mut form = match (&self.config, &self.preset) {
            (Some(path), _) => {
                let file = File::open(path)
                    .with_context(|| format!("cannot open config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("cannot parse config {}", path.display()))?
            }
            (None, Some(name)) => ProblemForm::preset(name)?,
            (None, None) => ProblemForm::default(),
        };
        if self.two_heaps {
            form.heaps = HeapCount::TwoHeaps;
        }
        if !self.moves.is_empty() {
            form.moves = self.moves.clone();
        }
        if let Some(condition) = &self.condition {
            form.win_condition = condition.clone();
        }
        let overrides = [
            (&self.win_value, &mut form.win_value),
            (&self.start, &mut form.range_start),
            (&self.end, &mut form.range_end),
            (&self.win_steps, &mut form.win_steps),
            (&self.lose_steps, &mut form.lose_steps),
        ];
        for (arg, field) in overrides {
            if let Some(value) = arg {
                *field = value.as_str().into();
            }
        }
        if let Some(heap2) = &self.heap2 {
            form.heap2_value = Some(heap2.as_str().into());
        }
        Ok(form)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let problem = args.form()?.validate()?;
    log::info!("solving {}", problem);
    let solution = problem.solve();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution.report())?);
    } else {
        print!("{}", solution);
    }
    Ok(())
}
