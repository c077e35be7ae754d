use std::path::PathBuf;

/// Fatal pipeline errors.
///
/// Each variant maps to a stable process exit code via [`AppError::exit_code`]
/// so shell scripts can distinguish failure classes. Row-level data-quality
/// problems are not errors: the cleaner drops those rows and reports counts.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Expected input file absent at the configured path.
    MissingFile { path: PathBuf },
    /// Input unreadable as tabular data, or the date column unparseable.
    DataFormat { message: String },
    /// Rolling window size was zero or negative.
    InvalidWindow { window: i64 },
    /// Unrecognized rolling summary function tag.
    UnsupportedWindowFunction { tag: String },
    /// Chart rendering or chart output I/O failed.
    Chart { message: String },
}

impl AppError {
    pub fn data_format(message: impl Into<String>) -> Self {
        AppError::DataFormat {
            message: message.into(),
        }
    }

    pub fn chart(message: impl Into<String>) -> Self {
        AppError::Chart {
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::MissingFile { .. } => 2,
            AppError::DataFormat { .. } => 3,
            AppError::InvalidWindow { .. } => 4,
            AppError::UnsupportedWindowFunction { .. } => 5,
            AppError::Chart { .. } => 6,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::MissingFile { path } => {
                write!(f, "Input file not found: '{}'", path.display())
            }
            AppError::DataFormat { message } => write!(f, "{message}"),
            AppError::InvalidWindow { window } => {
                write!(f, "Window size must be a positive integer (got {window}).")
            }
            AppError::UnsupportedWindowFunction { tag } => {
                write!(
                    f,
                    "Unsupported window function `{tag}` (expected mean, median, or sum)."
                )
            }
            AppError::Chart { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AppError {}
