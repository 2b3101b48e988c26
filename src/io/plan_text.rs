//! Text encoding of plans: `truck | drone customers | launch cells | reconvene cells`.
//!
//! Each segment is a comma-separated list of integers. `,|,`, `,|` and `|,`
//! are accepted as `|`, empty chunks are skipped, and surrounding whitespace
//! is trimmed, so `0,1,0,|-1|-1|-1` and `0,1,0|-1|-1|-1` read the same.

use std::fmt;
use std::str::FromStr;

use crate::error::PlanParseError;
use crate::models::Plan;

/// Parses a plan from its text encoding.
///
/// # Examples
///
/// ```
/// use u_strpd::io::parse_plan;
///
/// let plan = parse_plan("0,1,3,0,|,2,-1,|,1,-1,|,3,-1").unwrap();
/// assert_eq!(plan.truck_route(), &[0, 1, 3, 0]);
/// assert_eq!(plan.drone_customers(), &[2, -1]);
/// assert_eq!(plan.to_string(), "0,1,3,0|2,-1|1,-1|3,-1");
/// ```
pub fn parse_plan(text: &str) -> Result<Plan, PlanParseError> {
    let normalized = text
        .trim()
        .replace(",|,", "|")
        .replace(",|", "|")
        .replace("|,", "|");
    let segments: Vec<&str> = normalized.split('|').collect();
    let [truck, customers, launches, reconvenes] = segments.as_slice() else {
        return Err(PlanParseError::SegmentCount(segments.len()));
    };

    let truck_route = parse_integers(truck, 0)?
        .into_iter()
        .map(|v| {
            if v < 0 {
                return Err(PlanParseError::NegativeTruckNode(v));
            }
            usize::try_from(v).map_err(|_| PlanParseError::InvalidToken {
                segment: 0,
                token: v.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Plan::new(
        truck_route,
        parse_integers(customers, 1)?,
        parse_integers(launches, 2)?,
        parse_integers(reconvenes, 3)?,
    ))
}

fn parse_integers(segment: &str, index: usize) -> Result<Vec<i64>, PlanParseError> {
    segment
        .split(',')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            chunk.parse::<i64>().map_err(|_| PlanParseError::InvalidToken {
                segment: index,
                token: chunk.to_string(),
            })
        })
        .collect()
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

impl FromStr for Plan {
    type Err = PlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_plan(s)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, self.truck_route())?;
        f.write_str("|")?;
        write_joined(f, self.drone_customers())?;
        f.write_str("|")?;
        write_joined(f, self.launch_cells())?;
        f.write_str("|")?;
        write_joined(f, self.reconvene_cells())
    }
}
