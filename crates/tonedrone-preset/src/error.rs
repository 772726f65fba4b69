//! Error types for preset validation and processing.

use thiserror::Error;

/// Error codes for preset structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: `version` missing or not an integer
    InvalidVersion,
    /// E002: `metadata` missing or malformed
    InvalidMetadata,
    /// E003: `state` missing or not an object
    InvalidState,
    /// E004: `state.oscillators` missing or malformed
    InvalidOscillators,
    /// E005: `state.effects` missing an effect stage
    InvalidEffects,
    /// E006: `state.polysynths` missing or null
    MissingPolysynths,
    /// E007: `state.effectsBusSend` missing or not numeric
    InvalidBusSend,
    /// E008: `state.bpm` missing or not numeric
    InvalidBpm,
    /// E009: `state.bpm` outside the accepted range
    BpmOutOfRange,
    /// E010: document passed structural validation but did not decode into
    /// the typed model
    DecodeFailed,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidVersion => "E001",
            ErrorCode::InvalidMetadata => "E002",
            ErrorCode::InvalidState => "E003",
            ErrorCode::InvalidOscillators => "E004",
            ErrorCode::InvalidEffects => "E005",
            ErrorCode::MissingPolysynths => "E006",
            ErrorCode::InvalidBusSend => "E007",
            ErrorCode::InvalidBpm => "E008",
            ErrorCode::BpmOutOfRange => "E009",
            ErrorCode::DecodeFailed => "E010",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for preset structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Missing description
    MissingDescription,
    /// W002: Oscillator and sequence arrays differ in length
    VoiceSequenceMismatch,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::MissingDescription => "W001",
            WarningCode::VoiceSequenceMismatch => "W002",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "state.bpm").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Result of structural preset validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Creates a failed validation result.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            ok: false,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

/// Top-level error type for preset operations.
#[derive(Debug, Error)]
pub enum PresetError {
    /// JSON parsing error at the transport boundary.
    #[error("invalid preset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document never had the required top-level shape.
    #[error("invalid preset structure")]
    InvalidStructure(Vec<ValidationError>),

    /// Migration ran but could not recover a structurally valid document.
    #[error("invalid preset structure after migration")]
    InvalidAfterMigration(Vec<ValidationError>),

    /// The document's version is newer than this build supports.
    #[error("unsupported preset version {found} (latest supported version is {supported})")]
    UnsupportedVersion {
        /// Version embedded in the document.
        found: u64,
        /// Newest version this build understands.
        supported: u32,
    },

    /// Share-token base64 decoding error.
    #[error("invalid preset token: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Share-token payload was not UTF-8 text.
    #[error("preset token payload is not UTF-8: {0}")]
    TokenEncoding(#[from] std::string::FromUtf8Error),

    /// I/O error while reading or writing a preset file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PresetError {
    /// Structural errors carried by this error, if any.
    ///
    /// Convenient for callers rendering per-field diagnostics; empty for
    /// every variant other than the two structural ones.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            PresetError::InvalidStructure(errors)
            | PresetError::InvalidAfterMigration(errors) => errors,
            _ => &[],
        }
    }
}
