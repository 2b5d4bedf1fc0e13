use std::fmt;
use std::ops::AddAssign;
use std::ops::Index;
use std::ops::Mul;
use std::ops::SubAssign;

use num::Num;
use rand::distributions::Distribution;
use rand::distributions::Standard;
use rand::Rng;

use crate::error::NetworkError;
use crate::error::Result;

/// Dense row-major matrix. Each row holds the weights of one node, each column
/// one input of that node.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Matrix<T>
where
    T: MatrixItem,
{
    pub cols: usize,
    pub rows: usize,
    pub items: Vec<T>,
}

impl<T> Matrix<T>
where
    T: MatrixItem,
{
    pub fn new<I: Into<usize>>(cols: I, rows: I) -> Self {
        let (cols, rows) = (cols.into(), rows.into());
        let items = vec![T::default(); cols * rows];

        Self { cols, rows, items }
    }

    /// Build a matrix from nested rows. Every row must have the same, non-zero length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(NetworkError::EmptyVector),
        };

        let mut items = Vec::with_capacity(cols * rows.len());
        for row in rows {
            if row.len() != cols {
                return Err(NetworkError::DimensionMismatch {
                    expected: cols,
                    actual: row.len(),
                });
            }
            items.extend_from_slice(row);
        }

        Ok(Self {
            cols,
            rows: rows.len(),
            items,
        })
    }

    pub fn row(&self, row: usize) -> &[T] {
        if row >= self.rows {
            panic!("Row out of bounds while slicing matrix.");
        }

        &self.items[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        if row >= self.rows {
            panic!("Row out of bounds while slicing matrix.");
        }

        &mut self.items[row * self.cols..(row + 1) * self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    pub fn sum_squares(&self) -> T {
        self.items.iter().fold(T::zero(), |acc, &x| acc + x * x)
    }
}

impl<T> Matrix<T>
where
    T: MatrixItem,
    Standard: Distribution<T>,
{
    /// Fill the matrix with independent uniform draws in [-1, 1).
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for item in self.items.iter_mut() {
            *item = uniform_symmetric(rng);
        }
    }
}

/// A single uniform draw in [-1, 1).
pub fn uniform_symmetric<T, R>(rng: &mut R) -> T
where
    T: MatrixItem,
    R: Rng + ?Sized,
    Standard: Distribution<T>,
{
    let two = T::one() + T::one();
    rng.gen::<T>() * two - T::one()
}

pub trait MatrixItem
where
    Self: std::fmt::Debug + Default + Clone + Copy + Num + AddAssign + SubAssign,
{
}

impl MatrixItem for f32 {}
impl MatrixItem for f64 {}

impl<T> Mul<T> for Matrix<T>
where
    T: MatrixItem,
{
    type Output = Matrix<T>;

    fn mul(mut self, scalar: T) -> Self::Output {
        for item in self.items.iter_mut() {
            *item = *item * scalar;
        }

        self
    }
}

impl<T> SubAssign<&Matrix<T>> for Matrix<T>
where
    T: MatrixItem,
{
    fn sub_assign(&mut self, other: &Matrix<T>) {
        if self.cols != other.cols || self.rows != other.rows {
            panic!("Invalid matrix dimensions, cannot subtract matrix.");
        }

        for (item, &other_item) in self.items.iter_mut().zip(other.items.iter()) {
            *item -= other_item;
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: MatrixItem,
{
    type Output = T;

    fn index(&self, (cols, rows): (usize, usize)) -> &Self::Output {
        if cols >= self.cols || rows >= self.rows {
            panic!("Index out of bounds while indexing matrix.");
        }

        &self.items[rows * self.cols + cols]
    }
}

impl<T> fmt::Display for Matrix<T>
where
    T: MatrixItem,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.rows).map(|r| self.row(r)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_from_rows_is_row_major() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

        assert_eq!(m.cols, 3);
        assert_eq!(m.rows, 2);
        assert_eq!(m[(2, 0)], 3.0);
        assert_eq!(m[(0, 1)], 4.0);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_empty() {
        let ragged = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            ragged,
            Err(NetworkError::DimensionMismatch { expected: 2, actual: 1 })
        ));

        let empty: Result<Matrix<f64>> = Matrix::from_rows(&[]);
        assert!(matches!(empty, Err(NetworkError::EmptyVector)));

        let hollow: Result<Matrix<f64>> = Matrix::from_rows(&[vec![]]);
        assert!(matches!(hollow, Err(NetworkError::EmptyVector)));
    }

    #[test]
    fn test_scale_then_subtract() {
        let mut m = Matrix::from_rows(&[vec![2.0, -4.0]]).unwrap();
        let decay = m.clone() * 0.5;
        m -= &decay;

        assert_eq!(m.items, vec![1.0, -2.0]);
        assert_eq!(m.sum_squares(), 5.0);
    }

    #[test]
    fn test_randomize_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut m: Matrix<f64> = Matrix::new(16usize, 16usize);
        m.randomize(&mut rng);

        assert!(m.items.iter().all(|&x| (-1.0..1.0).contains(&x)));
        assert!(m.items.iter().any(|&x| x < 0.0));
        assert!(m.items.iter().any(|&x| x > 0.0));
    }
}
