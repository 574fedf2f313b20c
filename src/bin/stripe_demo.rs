//==============================================================================
// Striped evaluator demo
//
// Run with: cargo run --bin stripe-demo [config.toml] [add|sub|mult|div ...]
//==============================================================================

use colored::Colorize;
use std::env;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::thread;
use stripe_eval::op::UnknownOp;
use stripe_eval::{
    console_print, BinaryOp, EvaluatorConfig, ParallelBinaryEvaluator, SynchronizedConsole,
};

#[derive(Debug, Default, PartialEq)]
struct DemoArgs {
    config: Option<PathBuf>,
    ops: Vec<BinaryOp>,
}

/// `*.toml` arguments name the config file, anything else must be an
/// operator. No operators means all four.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<DemoArgs, UnknownOp> {
    let mut parsed = DemoArgs::default();
    for arg in args {
        if arg.ends_with(".toml") {
            parsed.config = Some(PathBuf::from(arg));
        } else {
            parsed.ops.push(arg.parse()?);
        }
    }
    if parsed.ops.is_empty() {
        parsed.ops = BinaryOp::ALL.to_vec();
    }
    Ok(parsed)
}

fn print_thread_ids() -> io::Result<()> {
    let console = SynchronizedConsole::new();
    thread::scope(|s| {
        let handles: Vec<_> = (0..3)
            .map(|_| {
                s.spawn(move || {
                    let id = format!("{:?}", thread::current().id());
                    console.print(&[&"id:", &id])
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err(io::Error::other("printer thread panicked")))
            })
            .collect()
    })
}

fn format_row(values: &[f32]) -> String {
    values.iter().map(|v| format!("{v}, ")).collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = parse_args(env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => EvaluatorConfig::from_file(path)?,
        None => EvaluatorConfig::with_workers(2),
    };
    let evaluator = ParallelBinaryEvaluator::from_config(&config)?;

    println!("{}", "=== Synchronized Console ===".bold());
    print_thread_ids()?;

    println!(
        "\n{}",
        format!("=== Striped Evaluation ({} workers) ===", evaluator.workers()).bold()
    );
    let v0: [f32; 7] = [1.0, 9.0, 8.0, 6.0, 7.0, 2.0, 2.0];
    let v1: [f32; 7] = [4.0, 1.0, 2.0, 1.0, 6.0, 8.0, 9.0];

    for op in args.ops {
        let row = evaluator.evaluate(&v0, &v1, op)?;
        console_print!(format!("{:>4} ", op.name()).cyan(), format_row(&row))?;
    }

    Ok(())
}
