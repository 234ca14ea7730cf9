//! Examples, column schemas and the text loader.
//!
//! Column roles come from the header names:
//!
//! | Header | Kind | Role |
//! |---|---|---|
//! | first letter uppercase (`Weight`) | numeric | |
//! | otherwise (`origin`) | symbolic | |
//! | ends with `+` (`Acc+`) | | goal, maximize |
//! | ends with `-` (`Lbs-`) | | goal, minimize |
//! | ends with `!` (`class!`) | | class label |
//! | ends with `X` (`HpX`) | | ignored |
//! | anything else | | independent |
//!
//! Goals and the class label are the dependent (`y`) fields of an
//! [`Example`]; independent columns are its `x` fields.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::stats;
use crate::summary::{Summary, SummaryConfig};
use crate::value::{Kind, Value};

// ---------------------------------------------------------------------------
// Example
// ---------------------------------------------------------------------------

/// One row: independent fields `x` and dependent fields `y`.
///
/// Examples are immutable; synthesis and evaluation build new instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    x: Vec<Value>,
    y: Vec<Value>,
}

impl Example {
    pub fn new(x: Vec<Value>, y: Vec<Value>) -> Self {
        Self { x, y }
    }

    /// An example whose `y_arity` dependent fields are not yet known.
    pub fn unevaluated(x: Vec<Value>, y_arity: usize) -> Self {
        Self {
            x,
            y: vec![Value::Missing; y_arity],
        }
    }

    pub fn x(&self) -> &[Value] {
        &self.x
    }

    pub fn y(&self) -> &[Value] {
        &self.y
    }

    /// True when no dependent field is missing.
    pub fn is_evaluated(&self) -> bool {
        !self.y.iter().any(Value::is_missing)
    }

    /// Returns a copy of this example with `y` replaced.
    pub fn with_y(&self, y: Vec<Value>) -> Self {
        Self {
            x: self.x.clone(),
            y,
        }
    }
}

/// Working set of examples for mutation and synthesis.
pub type Population = Vec<Example>;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Independent,
    /// A goal to minimize (`heaven = 0`) or maximize (`heaven = 1`).
    Goal { maximize: bool },
    Class,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Position in the raw row.
    pub at: usize,
    pub kind: Kind,
    pub role: Role,
}

impl Column {
    /// Parses a header cell.
    pub fn parse(at: usize, name: &str) -> Result<Self> {
        let first = name
            .chars()
            .next()
            .ok_or_else(|| Error::Schema(format!("column {at} has an empty name")))?;
        let kind = if first.is_uppercase() {
            Kind::Num
        } else {
            Kind::Sym
        };
        let role = match name.chars().last() {
            Some('X') => Role::Ignored,
            Some('+') => Role::Goal { maximize: true },
            Some('-') => Role::Goal { maximize: false },
            Some('!') => Role::Class,
            _ => Role::Independent,
        };
        if matches!(role, Role::Goal { .. }) && kind != Kind::Num {
            return Err(Error::Schema(format!(
                "goal column {name:?} must be numeric (start with an uppercase letter)"
            )));
        }
        Ok(Self {
            name: name.to_owned(),
            at,
            kind,
            role,
        })
    }

    /// Target value for goals: 1 when maximizing, 0 when minimizing.
    pub fn heaven(&self) -> Option<f64> {
        match self.role {
            Role::Goal { maximize } => Some(if maximize { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

/// Column layout of a dataset, split into `x` and `y` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
    x: Vec<usize>,
    y: Vec<usize>,
}

impl Schema {
    /// Builds a schema from header names.
    ///
    /// # Examples
    /// ```
    /// use u_simpler::data::Schema;
    /// let schema = Schema::from_header(&["Clndrs", "Volume", "HpX", "origin", "Lbs-", "Mpg+"]).unwrap();
    /// assert_eq!(schema.x_arity(), 3);
    /// assert_eq!(schema.y_arity(), 2);
    /// ```
    pub fn from_header<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::Schema("header has no columns".to_owned()));
        }
        let mut columns = Vec::with_capacity(names.len());
        let (mut x, mut y) = (Vec::new(), Vec::new());
        let mut classes = 0;
        for (at, name) in names.iter().enumerate() {
            let col = Column::parse(at, name.as_ref())?;
            match col.role {
                Role::Independent => x.push(at),
                Role::Goal { .. } => y.push(at),
                Role::Class => {
                    classes += 1;
                    y.push(at);
                }
                Role::Ignored => {}
            }
            columns.push(col);
        }
        if classes > 1 {
            return Err(Error::Schema(format!(
                "at most one class column allowed, found {classes}"
            )));
        }
        Ok(Self { columns, x, y })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Width of a raw row.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn x_arity(&self) -> usize {
        self.x.len()
    }

    pub fn y_arity(&self) -> usize {
        self.y.len()
    }

    pub fn x_columns(&self) -> impl Iterator<Item = &Column> {
        self.x.iter().map(|&at| &self.columns[at])
    }

    pub fn y_columns(&self) -> impl Iterator<Item = &Column> {
        self.y.iter().map(|&at| &self.columns[at])
    }

    /// Splits a raw row into an example.
    pub fn example(&self, row: &[Value]) -> Result<Example> {
        if row.len() != self.width() {
            return Err(Error::ArityMismatch {
                expected: self.width(),
                got: row.len(),
            });
        }
        let pick = |idx: &[usize]| idx.iter().map(|&at| row[at].clone()).collect::<Vec<_>>();
        Ok(Example::new(pick(&self.x), pick(&self.y)))
    }

    /// Converts a raw text cell into a value of column `at`'s kind.
    fn coerce(&self, at: usize, cell: &str, line: usize) -> Result<Value> {
        if cell == "?" {
            return Ok(Value::Missing);
        }
        match self.columns[at].kind {
            Kind::Sym => Ok(Value::Sym(cell.to_owned())),
            Kind::Num => {
                let name = &self.columns[at].name;
                let x = cell.parse::<f64>().map_err(|e| Error::Parse {
                    line,
                    message: format!("column {name:?}: {cell:?} is not a number ({e})"),
                })?;
                if !x.is_finite() {
                    return Err(Error::Parse {
                        line,
                        message: format!("column {name:?}: {cell:?} is not finite"),
                    });
                }
                Ok(Value::Num(x))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// A loaded dataset: schema, examples, and a summary per `x` and `y` field.
#[derive(Debug, Clone)]
pub struct Data {
    schema: Schema,
    examples: Vec<Example>,
    x_summaries: Vec<Summary>,
    y_summaries: Vec<Summary>,
    config: SummaryConfig,
}

impl Data {
    pub fn new(schema: Schema, config: SummaryConfig) -> Self {
        let x_summaries = schema
            .x_columns()
            .map(|c| Summary::new(c.kind, config))
            .collect();
        let y_summaries = schema
            .y_columns()
            .map(|c| Summary::new(c.kind, config))
            .collect();
        Self {
            schema,
            examples: Vec::new(),
            x_summaries,
            y_summaries,
            config,
        }
    }

    /// Loads comma-separated text. The first non-blank line is the header.
    ///
    /// Whitespace, double quotes and `#` comments are stripped; `?` marks a
    /// missing cell.
    ///
    /// # Examples
    /// ```
    /// use u_simpler::data::Data;
    /// use u_simpler::summary::SummaryConfig;
    ///
    /// let text = "Size, color, Price-\n1, red, 10\n3, blue, ?\n";
    /// let data = Data::from_reader(text.as_bytes(), SummaryConfig::default()).unwrap();
    /// assert_eq!(data.len(), 2);
    /// assert_eq!(data.schema().x_arity(), 2);
    /// ```
    pub fn from_reader<R: BufRead>(reader: R, config: SummaryConfig) -> Result<Self> {
        let mut data: Option<Data> = None;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = i + 1;
            let cleaned = clean(&line);
            if cleaned.is_empty() {
                continue;
            }
            let cells: Vec<&str> = cleaned.split(',').collect();
            match data.as_mut() {
                None => data = Some(Data::new(Schema::from_header(&cells)?, config)),
                Some(d) => {
                    if cells.len() != d.schema.width() {
                        return Err(Error::Schema(format!(
                            "line {lineno}: expected {} cells, got {}",
                            d.schema.width(),
                            cells.len()
                        )));
                    }
                    let row = cells
                        .iter()
                        .enumerate()
                        .map(|(at, cell)| d.schema.coerce(at, cell, lineno))
                        .collect::<Result<Vec<_>>>()?;
                    let example = d.schema.example(&row)?;
                    d.add(example)?;
                }
            }
        }
        let data = data.ok_or_else(|| Error::Schema("no header row".to_owned()))?;
        info!(
            rows = data.len(),
            x = data.schema.x_arity(),
            y = data.schema.y_arity(),
            "loaded data"
        );
        Ok(data)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, config: SummaryConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// An empty dataset with the same schema.
    pub fn clone_empty(&self) -> Self {
        Self::new(self.schema.clone(), self.config)
    }

    /// Appends an example and updates the column summaries.
    pub fn add(&mut self, example: Example) -> Result<()> {
        if example.x().len() != self.schema.x_arity() {
            return Err(Error::ArityMismatch {
                expected: self.schema.x_arity(),
                got: example.x().len(),
            });
        }
        if example.y().len() != self.schema.y_arity() {
            return Err(Error::ArityMismatch {
                expected: self.schema.y_arity(),
                got: example.y().len(),
            });
        }
        for (summary, v) in self.x_summaries.iter_mut().zip(example.x()) {
            summary.add(v)?;
        }
        for (summary, v) in self.y_summaries.iter_mut().zip(example.y()) {
            summary.add(v)?;
        }
        self.examples.push(example);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn x_summaries(&self) -> &[Summary] {
        &self.x_summaries
    }

    pub fn y_summaries(&self) -> &[Summary] {
        &self.y_summaries
    }

    /// Values of the `i`-th `x` field across all examples.
    ///
    /// # Panics
    /// If `i >= self.schema().x_arity()` and there is at least one example.
    pub fn x_column(&self, i: usize) -> Vec<Value> {
        self.examples.iter().map(|e| e.x()[i].clone()).collect()
    }

    /// Values of the `i`-th `y` field across all examples.
    ///
    /// # Panics
    /// If `i >= self.schema().y_arity()` and there is at least one example.
    pub fn y_column(&self, i: usize) -> Vec<Value> {
        self.examples.iter().map(|e| e.y()[i].clone()).collect()
    }

    /// Distance to heaven: root mean square over goal columns of
    /// `|norm(y) - heaven|`. Lower is better.
    ///
    /// Returns `None` when the schema has no goals or a goal of `example`
    /// is missing.
    pub fn d2h(&self, example: &Example) -> Option<f64> {
        let mut squares = Vec::with_capacity(self.y_summaries.len());
        for ((col, summary), v) in self
            .schema
            .y_columns()
            .zip(&self.y_summaries)
            .zip(example.y())
        {
            let Some(heaven) = col.heaven() else {
                continue;
            };
            let x = v.as_num()?;
            let num = summary.as_num()?;
            squares.push((num.norm(x) - heaven).powi(2));
        }
        let n = squares.len();
        (n > 0).then(|| (stats::kahan_sum(&squares) / n as f64).sqrt())
    }

    /// Examples ordered best first by [`d2h`](Self::d2h); unscorable ones last.
    pub fn sorted_by_d2h(&self) -> Vec<&Example> {
        let mut scored: Vec<(f64, &Example)> = self
            .examples
            .iter()
            .map(|e| (self.d2h(e).unwrap_or(f64::INFINITY), e))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.into_iter().map(|(_, e)| e).collect()
    }
}

/// Strips whitespace, double quotes and `#` comments from a line.
fn clean(line: &str) -> String {
    let line = line.split('#').next().unwrap_or("");
    line.chars()
        .filter(|c| !c.is_whitespace() && *c != '"')
        .collect()
}
