use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required column '{column}' for {role} and no override given")]
    MissingRequiredColumn { role: String, column: String },

    #[error("Length mismatch for '{name}': expected {expected} values, got {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column '{0}' in input header")]
    DuplicateColumn(String),

    #[error("Column '{name}' is not numeric")]
    NotNumeric { name: String },

    #[error("Error reading from stdin: {source}")]
    ReadStdin {
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading file '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON for --columns-json: {source}")]
    ParseColumnsJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in column map file: {source}")]
    ParseColumnsToml {
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not serialize output to JSON: {source}")]
    SerializeOutput {
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing input data: provide --input FILE or --input - for stdin")]
    MissingInputData,

    #[error("Invalid delimiter '{0}': must be a single ASCII character")]
    InvalidDelimiter(String),
}
