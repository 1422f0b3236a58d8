#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
pub fn run() -> Result<(), crate::error::AppError> {
    use crate::adapters::cli::{Args, init_logging, load_table, parse_column_map, print_output};

    let args = Args::parse();
    init_logging(args.verbose);

    let map = parse_column_map(&args)?;
    let table = load_table(&args)?;
    let out = args.stage.apply(table, &map)?;

    print_output(&out, &args)?;

    Ok(())
}
