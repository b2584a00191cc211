use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum WarpfieldError {
    #[error("Invalid length for SIP coefficients {axis}: expected {expected}, found {found}")]
    InvalidCoefficientLength {
        axis: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Required column not found: {0}")]
    MissingColumn(String),

    #[error("Column '{column}' has {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Column '{column}' has an incompatible unit: {unit}")]
    InvalidColumnUnit { column: String, unit: String },

    #[error("Column '{0}' already exists in the table")]
    DuplicateColumn(String),

    #[error("Celestial coordinates are not available for this table")]
    SkyCoordUnavailable,

    #[error("No proper motion information is available")]
    ProperMotionUnavailable,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PartialEq for WarpfieldError {
    fn eq(&self, other: &Self) -> bool {
        use WarpfieldError::*;
        match (self, other) {
            (
                InvalidCoefficientLength {
                    axis: a1,
                    expected: e1,
                    found: f1,
                },
                InvalidCoefficientLength {
                    axis: a2,
                    expected: e2,
                    found: f2,
                },
            ) => a1 == a2 && e1 == e2 && f1 == f2,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (
                ColumnLengthMismatch {
                    column: c1,
                    expected: e1,
                    found: f1,
                },
                ColumnLengthMismatch {
                    column: c2,
                    expected: e2,
                    found: f2,
                },
            ) => c1 == c2 && e1 == e2 && f1 == f2,
            (
                InvalidColumnUnit { column: c1, unit: u1 },
                InvalidColumnUnit { column: c2, unit: u2 },
            ) => c1 == c2 && u1 == u2,
            (DuplicateColumn(a), DuplicateColumn(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,

            (SkyCoordUnavailable, SkyCoordUnavailable) => true,
            (ProperMotionUnavailable, ProperMotionUnavailable) => true,

            _ => false,
        }
    }
}
