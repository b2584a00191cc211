//! # Columnar quantity tables
//!
//! A [`QTable`] is an ordered set of named columns sharing a common row count. Each
//! [`Column`] carries its values and, for physical quantities, the [`ColumnUnit`] they are
//! expressed in. Numerical values are always read back through [`QTable::values_in`], which
//! converts them to the unit requested by the caller.
use std::{fmt, str::FromStr};

use crate::{
    constants::{RADEG, RADMAS},
    warpfield_errors::WarpfieldError,
};

/// Physical dimension of a column unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Angle,
    AngularRate,
    Time,
    Length,
    Magnitude,
    Pixel,
}

/// Units recognised in table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnUnit {
    Degree,
    Radian,
    ArcSec,
    MilliArcSec,
    MasPerYear,
    Year,
    Micrometer,
    Millimeter,
    Magnitude,
    Pixel,
}

impl ColumnUnit {
    pub fn kind(&self) -> UnitKind {
        match self {
            ColumnUnit::Degree | ColumnUnit::Radian | ColumnUnit::ArcSec | ColumnUnit::MilliArcSec => {
                UnitKind::Angle
            }
            ColumnUnit::MasPerYear => UnitKind::AngularRate,
            ColumnUnit::Year => UnitKind::Time,
            ColumnUnit::Micrometer | ColumnUnit::Millimeter => UnitKind::Length,
            ColumnUnit::Magnitude => UnitKind::Magnitude,
            ColumnUnit::Pixel => UnitKind::Pixel,
        }
    }

    /// Factor converting a value in this unit into the base unit of its kind
    /// (radian, mas/yr, year, micrometer, magnitude, pixel).
    fn base_factor(&self) -> f64 {
        match self {
            ColumnUnit::Degree => RADEG,
            ColumnUnit::Radian => 1.0,
            ColumnUnit::ArcSec => RADMAS * 1000.0,
            ColumnUnit::MilliArcSec => RADMAS,
            ColumnUnit::Millimeter => 1000.0,
            ColumnUnit::MasPerYear
            | ColumnUnit::Year
            | ColumnUnit::Micrometer
            | ColumnUnit::Magnitude
            | ColumnUnit::Pixel => 1.0,
        }
    }

    /// Conversion factor from `self` to `target`, if both share a dimension.
    pub fn conversion_factor(&self, target: ColumnUnit) -> Option<f64> {
        if self == &target {
            return Some(1.0);
        }
        (self.kind() == target.kind()).then(|| self.base_factor() / target.base_factor())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnUnit::Degree => "degree",
            ColumnUnit::Radian => "rad",
            ColumnUnit::ArcSec => "arcsec",
            ColumnUnit::MilliArcSec => "mas",
            ColumnUnit::MasPerYear => "mas/year",
            ColumnUnit::Year => "year",
            ColumnUnit::Micrometer => "um",
            ColumnUnit::Millimeter => "mm",
            ColumnUnit::Magnitude => "mag",
            ColumnUnit::Pixel => "pix",
        }
    }
}

impl fmt::Display for ColumnUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnUnit {
    type Err = WarpfieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "degree" | "deg" => Ok(ColumnUnit::Degree),
            "rad" | "radian" => Ok(ColumnUnit::Radian),
            "arcsec" => Ok(ColumnUnit::ArcSec),
            "mas" => Ok(ColumnUnit::MilliArcSec),
            "mas/year" | "mas/yr" => Ok(ColumnUnit::MasPerYear),
            "year" | "yr" => Ok(ColumnUnit::Year),
            "um" | "micron" => Ok(ColumnUnit::Micrometer),
            "mm" => Ok(ColumnUnit::Millimeter),
            "mag" => Ok(ColumnUnit::Magnitude),
            "pix" | "pixel" => Ok(ColumnUnit::Pixel),
            other => Err(WarpfieldError::InvalidParameter(format!(
                "unknown column unit '{other}'"
            ))),
        }
    }
}

/// Values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Bool(Vec<bool>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Float(v) => ColumnData::Float(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Int(v) => ColumnData::Int(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Bool(v) => ColumnData::Bool(indices.iter().map(|&i| v[i]).collect()),
        }
    }
}

/// A table column: values plus an optional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub data: ColumnData,
    pub unit: Option<ColumnUnit>,
}

impl Column {
    pub fn float(values: Vec<f64>, unit: ColumnUnit) -> Self {
        Column {
            data: ColumnData::Float(values),
            unit: Some(unit),
        }
    }

    pub fn dimensionless(values: Vec<f64>) -> Self {
        Column {
            data: ColumnData::Float(values),
            unit: None,
        }
    }

    pub fn int(values: Vec<i64>) -> Self {
        Column {
            data: ColumnData::Int(values),
            unit: None,
        }
    }

    pub fn bool(values: Vec<bool>) -> Self {
        Column {
            data: ColumnData::Bool(values),
            unit: None,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values converted to `unit`.
    ///
    /// A column without unit is read as if it were already expressed in `unit`.
    /// Integer columns are cast to `f64`; boolean columns cannot be read as quantities.
    pub fn values_in(&self, name: &str, unit: ColumnUnit) -> Result<Vec<f64>, WarpfieldError> {
        let factor = match self.unit {
            None => 1.0,
            Some(own) => own
                .conversion_factor(unit)
                .ok_or_else(|| WarpfieldError::InvalidColumnUnit {
                    column: name.to_string(),
                    unit: own.to_string(),
                })?,
        };
        match &self.data {
            ColumnData::Float(v) => Ok(v.iter().map(|x| x * factor).collect()),
            ColumnData::Int(v) => Ok(v.iter().map(|x| *x as f64 * factor).collect()),
            ColumnData::Bool(_) => Err(WarpfieldError::InvalidColumnUnit {
                column: name.to_string(),
                unit: "bool".to_string(),
            }),
        }
    }
}

/// Ordered collection of named columns with a common length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    columns: Vec<(String, Column)>,
}

impl QTable {
    pub fn new() -> Self {
        QTable::default()
    }

    /// Builder-style variant of [`QTable::add_column`].
    pub fn with_column(mut self, name: &str, column: Column) -> Result<Self, WarpfieldError> {
        self.add_column(name, column)?;
        Ok(self)
    }

    /// Append a column.
    ///
    /// Fails if a column of the same name exists or if the row count differs from the
    /// columns already present.
    pub fn add_column(&mut self, name: &str, column: Column) -> Result<(), WarpfieldError> {
        if self.contains(name) {
            return Err(WarpfieldError::DuplicateColumn(name.to_string()));
        }
        if let Some((_, first)) = self.columns.first() {
            if first.len() != column.len() {
                return Err(WarpfieldError::ColumnLengthMismatch {
                    column: name.to_string(),
                    expected: first.len(),
                    found: column.len(),
                });
            }
        }
        self.columns.push((name.to_string(), column));
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn colnames(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find_map(|(n, c)| (n == name).then_some(c))
    }

    /// Like [`QTable::column`] but reports a missing column as an error.
    pub fn require(&self, name: &str) -> Result<&Column, WarpfieldError> {
        self.column(name)
            .ok_or_else(|| WarpfieldError::MissingColumn(name.to_string()))
    }

    /// Values of column `name` converted to `unit`.
    pub fn values_in(&self, name: &str, unit: ColumnUnit) -> Result<Vec<f64>, WarpfieldError> {
        self.require(name)?.values_in(name, unit)
    }

    /// New table holding the rows at `indices`, in that order.
    ///
    /// # Panics
    /// If an index is not smaller than [`QTable::len`].
    pub fn take(&self, indices: &[usize]) -> QTable {
        QTable {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| {
                    (
                        n.clone(),
                        Column {
                            data: c.data.take(indices),
                            unit: c.unit,
                        },
                    )
                })
                .collect(),
        }
    }
}
