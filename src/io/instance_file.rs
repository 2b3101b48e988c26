//! Sectioned problem-instance files.
//!
//! ```text
//! # number of customers
//! 2
//! # drone flight range
//! 30
//! # truck travel times
//! 0 10 20
//! 10 0 10
//! 20 10 0
//! # drone flight times
//! 0 5 10
//! 5 0 5
//! 10 5 0
//! ```
//!
//! Lines starting with `#` open the next section; the text after `#` is not
//! interpreted. Blank lines are skipped. Data before the first marker or
//! after the fourth section is ignored. The fleet size is not part of the
//! file and is supplied by the caller.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::error::InstanceFileError;
use crate::models::Instance;

const CUSTOMERS: &str = "customer count";
const FLIGHT_RANGE: &str = "flight range";
const TRUCK: &str = "truck times";
const DRONE: &str = "drone times";

/// Parses an instance from the text of a sectioned file.
///
/// # Examples
///
/// ```
/// use u_strpd::io::parse_instance;
///
/// let text = "#customers\n1\n#range\n25\n#truck\n0 10\n10 0\n#drone\n0 5\n5 0\n";
/// let instance = parse_instance(text, 2).unwrap();
/// assert_eq!(instance.n_customers(), 1);
/// assert_eq!(instance.flight_range(), 25.0);
/// assert_eq!(instance.drone_time(0, 1), 5.0);
/// ```
pub fn parse_instance(text: &str, n_drones: usize) -> Result<Instance, InstanceFileError> {
    read_instance(text.as_bytes(), n_drones)
}

/// Loads an instance from a sectioned file on disk.
pub fn load_instance(
    path: impl AsRef<Path>,
    n_drones: usize,
) -> Result<Instance, InstanceFileError> {
    let path = path.as_ref();
    debug!(path = %path.display(), n_drones, "loading instance");
    let file = File::open(path)?;
    read_instance(BufReader::new(file), n_drones)
}

/// Reads an instance from any buffered reader.
pub fn read_instance<R: BufRead>(reader: R, n_drones: usize) -> Result<Instance, InstanceFileError> {
    let mut section = 0usize;
    let mut n_customers: Option<usize> = None;
    let mut flight_range: Option<f64> = None;
    let mut truck_rows: Vec<Vec<f64>> = Vec::new();
    let mut drone_rows: Vec<Vec<f64>> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') {
            section += 1;
            continue;
        }
        match section {
            1 if n_customers.is_none() => {
                let token = first_token(trimmed);
                let count = token.parse::<usize>().map_err(|_| InstanceFileError::InvalidNumber {
                    line: line_no,
                    token: token.to_string(),
                })?;
                n_customers = Some(count);
            }
            2 if flight_range.is_none() => {
                flight_range = Some(parse_number(first_token(trimmed), line_no)?);
            }
            3 => truck_rows.push(parse_row(trimmed, line_no)?),
            4 => drone_rows.push(parse_row(trimmed, line_no)?),
            _ => {}
        }
    }

    let n_customers = n_customers.ok_or(InstanceFileError::MissingSection(CUSTOMERS))?;
    let flight_range = flight_range.ok_or(InstanceFileError::MissingSection(FLIGHT_RANGE))?;
    let truck = matrix_section(truck_rows, TRUCK, "truck", n_customers + 1)?;
    let drone = matrix_section(drone_rows, DRONE, "drone", n_customers + 1)?;

    let instance = Instance::new(truck, drone, n_drones, flight_range)?;
    debug!(
        n_customers,
        n_drones,
        flight_range,
        "instance loaded"
    );
    Ok(instance)
}

/// Writes an instance in the sectioned format read by [`read_instance`].
///
/// Only node 0 can act as depot in the file format; the depot is not written.
pub fn write_instance<W: Write>(instance: &Instance, mut writer: W) -> io::Result<()> {
    writeln!(writer, "# number of customers")?;
    writeln!(writer, "{}", instance.n_customers())?;
    writeln!(writer, "# drone flight range")?;
    writeln!(writer, "{}", instance.flight_range())?;
    writeln!(writer, "# truck travel times")?;
    write_matrix(&mut writer, instance.truck_matrix())?;
    writeln!(writer, "# drone flight times")?;
    write_matrix(&mut writer, instance.drone_matrix())
}

fn write_matrix<W: Write>(writer: &mut W, matrix: &DistanceMatrix) -> io::Result<()> {
    for row in matrix.rows() {
        let line: Vec<String> = row.iter().map(f64::to_string).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

fn matrix_section(
    rows: Vec<Vec<f64>>,
    section: &'static str,
    matrix: &'static str,
    expected: usize,
) -> Result<DistanceMatrix, InstanceFileError> {
    if rows.is_empty() {
        return Err(InstanceFileError::MissingSection(section));
    }
    if rows.len() != expected {
        return Err(InstanceFileError::RowCount {
            section,
            found: rows.len(),
            expected,
        });
    }
    Ok(DistanceMatrix::from_named_rows(rows, matrix)?)
}

fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or(line)
}

fn parse_number(token: &str, line: usize) -> Result<f64, InstanceFileError> {
    token.parse::<f64>().map_err(|_| InstanceFileError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_row(line: &str, line_no: usize) -> Result<Vec<f64>, InstanceFileError> {
    line.split_whitespace()
        .map(|token| parse_number(token, line_no))
        .collect()
}
