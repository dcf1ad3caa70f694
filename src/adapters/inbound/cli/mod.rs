pub mod args;
pub mod output;

pub use args::{Backend, Cli, Command, OutputFormat};
pub use output::ReportPrinter;
