//! Dense travel-time matrix.

use crate::error::InstanceError;

/// A dense n×n travel-time matrix stored in row-major order.
///
/// Used for both the truck's road times and the drones' flight times. Entries
/// are indexed by node, with node 0 conventionally the depot.
///
/// # Examples
///
/// ```
/// use u_strpd::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 8.0],
///     vec![5.0, 0.0, 4.0],
///     vec![8.0, 4.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.get(0, 1), 5.0);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from flat row-major data.
    ///
    /// Fails if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self, InstanceError> {
        if data.len() != size * size {
            return Err(InstanceError::DataLength {
                found: data.len(),
                expected: size * size,
            });
        }
        Ok(Self { data, size })
    }

    /// Creates a matrix from nested rows.
    ///
    /// Every row must have exactly as many entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, InstanceError> {
        Self::from_named_rows(rows, "input")
    }

    pub(crate) fn from_named_rows(
        rows: Vec<Vec<f64>>,
        name: &'static str,
    ) -> Result<Self, InstanceError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(InstanceError::RaggedRow {
                    matrix: name,
                    row,
                    found: values.len(),
                    expected: size,
                });
            }
            data.extend(values);
        }
        Ok(Self { data, size })
    }

    /// Returns the time from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the time from node `from` to node `to`.
    pub fn set(&mut self, from: usize, to: usize, time: f64) {
        self.data[from * self.size + to] = time;
    }

    /// Number of nodes covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterates over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks panics on zero
        self.data.chunks(self.size.max(1))
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Checks that every entry is finite and non-negative.
    ///
    /// `name` labels the matrix in the returned error.
    pub fn validate_entries(&self, name: &'static str) -> Result<(), InstanceError> {
        for (idx, &value) in self.data.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(InstanceError::InvalidEntry {
                    matrix: name,
                    from: idx / self.size,
                    to: idx % self.size,
                    value,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().take(self.size).map(<[f64]>::to_vec).collect()
    }
}
