use clap::{Parser, ValueEnum};
use std::fs::{self, File};
use std::io::{self, BufWriter};

use crate::error::AppError;
use crate::gas::calc_all;
use crate::gas::concentration::calc_dissolved_conc;
use crate::gas::saturation::calc_sat;
use crate::models::ColumnMap;
use crate::table::{SampleTable, read_stdin_table};

#[derive(Parser, Debug)]
#[command(author, version, about = "Dissolved CO2, CH4 and N2O from headspace equilibration data", long_about = None)]
pub struct Args {
    #[arg(
        long,
        value_name = "FILE",
        help = "Delimited sample table with a header row; '-' reads from stdin"
    )]
    input: Option<String>,
    #[arg(long, value_enum, default_value_t = Stage::All, help = "Which calculators to run")]
    pub stage: Stage,
    #[arg(
        long,
        value_name = "JSON",
        help = "Inline JSON column map, e.g. '{\"volGas\": \"gasVol\", \"baro\": 101.3}' (overrides --columns)"
    )]
    columns_json: Option<String>,
    #[arg(long, value_name = "FILE", help = "TOML file with the column map")]
    columns: Option<String>,
    #[arg(long, default_value = ",", help = "Field delimiter for input and output")]
    delimiter: String,
    #[arg(long, value_name = "FILE", help = "Write the result here instead of stdout")]
    output: Option<String>,
    #[arg(long, help = "Print JSON records instead of delimited text")]
    json: bool,
    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v info, -vv debug)")]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// Dissolved concentrations only
    Conc,
    /// Saturation only; the table must already hold dissolved concentrations
    Sat,
    /// Both, in order
    All,
}

impl Stage {
    pub fn apply(self, table: SampleTable, map: &ColumnMap) -> Result<SampleTable, AppError> {
        match self {
            Stage::Conc => calc_dissolved_conc(table, map),
            Stage::Sat => calc_sat(table, map),
            Stage::All => calc_all(table, map),
        }
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn delimiter_byte(args: &Args) -> Result<u8, AppError> {
    let d = if args.delimiter == "\\t" { "\t" } else { args.delimiter.as_str() };
    match d.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(AppError::InvalidDelimiter(args.delimiter.clone())),
    }
}

pub fn parse_column_map(args: &Args) -> Result<ColumnMap, AppError> {
    match (&args.columns_json, &args.columns) {
        (Some(json), _) => ColumnMap::from_json_str(json),
        (None, Some(path)) => {
            let s = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
                path: path.clone(),
                source,
            })?;
            ColumnMap::from_toml_str(&s)
        }
        (None, None) => Ok(ColumnMap::default()),
    }
}

pub fn load_table(args: &Args) -> Result<SampleTable, AppError> {
    let delimiter = delimiter_byte(args)?;
    match &args.input {
        Some(path) if path == "-" => read_stdin_table(delimiter),
        Some(path) => SampleTable::from_csv_path(path, delimiter),
        None => Err(AppError::MissingInputData),
    }
}

pub fn print_output(out: &SampleTable, args: &Args) -> Result<(), AppError> {
    if args.json {
        let s = serde_json::to_string_pretty(&out.to_json_records())
            .map_err(|source| AppError::SerializeOutput { source })?;
        match &args.output {
            Some(path) => fs::write(path, s).map_err(|source| AppError::WriteFile {
                path: path.clone(),
                source,
            })?,
            None => println!("{}", s),
        }
        return Ok(());
    }

    let delimiter = delimiter_byte(args)?;
    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| AppError::WriteFile {
                path: path.clone(),
                source,
            })?;
            out.write_csv(BufWriter::new(file), delimiter)?;
            log::info!("wrote {} rows to {}", out.n_rows(), path);
        }
        None => out.write_csv(io::stdout().lock(), delimiter)?,
    }

    Ok(())
}
