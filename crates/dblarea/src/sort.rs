//! Sorting of matrix rows/columns with the permutation kept alongside.

use std::cmp::Ordering;

use nalgebra::DMatrix;

/// Which lines of the matrix are sorted independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortAxis {
    /// Sort the entries within each row.
    Row,
    /// Sort the entries within each column.
    Column,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Sort every row (or column) of `x` independently.
///
/// Returns `(sorted, idx)` with `sorted[(i, j)] == x[(i, idx[(i, j)])]` for
/// `SortAxis::Row` and `sorted[(i, j)] == x[(idx[(i, j)], j)]` for
/// `SortAxis::Column`. The sort is stable; NaNs go last in either order.
pub fn sort_rows(x: &DMatrix<f64>, axis: SortAxis, order: Order) -> (DMatrix<f64>, DMatrix<usize>) {
    let (nrows, ncols) = x.shape();
    let mut sorted = x.clone();
    let mut idx = DMatrix::<usize>::zeros(nrows, ncols);
    let (lines, len) = match axis {
        SortAxis::Row => (nrows, ncols),
        SortAxis::Column => (ncols, nrows),
    };
    let at = |line: usize, k: usize| match axis {
        SortAxis::Row => (line, k),
        SortAxis::Column => (k, line),
    };
    let mut perm: Vec<usize> = Vec::with_capacity(len);
    for line in 0..lines {
        perm.clear();
        perm.extend(0..len);
        perm.sort_by(|&p, &q| compare(x[at(line, p)], x[at(line, q)], order));
        for (k, &src) in perm.iter().enumerate() {
            sorted[at(line, k)] = x[at(line, src)];
            idx[at(line, k)] = src;
        }
    }
    (sorted, idx)
}

/// Sort three values in place, largest first.
#[inline]
pub(crate) fn sort3_desc(v: [f64; 3]) -> [f64; 3] {
    let mut v = v;
    if compare(v[0], v[1], Order::Descending) == Ordering::Greater {
        v.swap(0, 1);
    }
    if compare(v[1], v[2], Order::Descending) == Ordering::Greater {
        v.swap(1, 2);
    }
    if compare(v[0], v[1], Order::Descending) == Ordering::Greater {
        v.swap(0, 1);
    }
    v
}

fn compare(a: f64, b: f64, order: Order) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let o = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                Order::Ascending => o,
                Order::Descending => o.reverse(),
            }
        }
    }
}
