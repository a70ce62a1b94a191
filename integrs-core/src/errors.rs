use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum HitError {
    #[error("Hit positions are 1-based, got begin={0} end={1}")]
    InvalidPosition(u32, u32),

    #[error("E-value must be a non-negative number, got {0}")]
    InvalidEvalue(f64),

    #[error("Invalid strand: {0}")]
    InvalidStrand(String),

    #[error("Empty identifier for field `{0}`")]
    EmptyIdentifier(&'static str),
}

#[derive(Error, Debug)]
pub enum HitTableError {
    #[error("Line {line}: expected at least {expected} tab-separated columns, found {found}")]
    MissingColumns {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: can't parse `{field}` from `{value}`")]
    FieldParseError {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Line {line}: {source}")]
    InvalidHit {
        line: usize,
        #[source]
        source: HitError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RepliconError {
    #[error("Replicon size must be positive: {0}")]
    EmptyReplicon(String),

    #[error("Unknown topology: {0}. Expected `circ` or `lin`")]
    UnknownTopology(String),

    #[error("Replicon not found: {0}")]
    UnknownReplicon(String),

    #[error("No sequence loaded for replicon {0}")]
    MissingSequence(String),

    #[error("Window {begin}..{end} is out of bounds for replicon {id} of size {size}")]
    WindowOutOfBounds {
        id: String,
        begin: u32,
        end: u32,
        size: u32,
    },

    #[error("Error reading sequence file: {0}")]
    FastaError(String),

    #[error("Error parsing sizes file at line {0}: {1}")]
    SizesParseError(usize, String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
