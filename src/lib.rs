//! Elementwise arithmetic over two equal-length slices, split round-robin
//! across a fixed number of scoped worker threads.
//!
//! ```
//! use stripe_eval::ParallelBinaryEvaluator;
//!
//! let ev = ParallelBinaryEvaluator::with_workers(2)?;
//! assert_eq!(ev.add(&[1, 9, 8], &[4, 1, 2])?, vec![5, 10, 10]);
//! # Ok::<(), stripe_eval::EvalError>(())
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod evaluator;
pub mod op;
pub mod partition;

pub use config::EvaluatorConfig;
pub use console::SynchronizedConsole;
pub use error::{ConfigError, EvalError};
pub use evaluator::ParallelBinaryEvaluator;
pub use op::BinaryOp;
pub use partition::StripePartition;
