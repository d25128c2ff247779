use std::fmt;

use crate::error::{try_alloc, try_with_capacity, AllocSite, Error, Result};

/// A single contiguous arena split into rows by an `(offset, width)` table
/// computed once at allocation time.
#[derive(Clone)]
pub struct RowBuffer {
    buffer: Box<[f64]>,
    row_offsets_and_sizes: Box<[(usize, usize)]>,
}

impl fmt::Debug for RowBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = &mut f.debug_struct("RowBuffer");
        if self.buffer.len() < 30 {
            s = s.field("buffer", &self.buffer);
        } else {
            s = s.field("buffer_len", &self.buffer.len());
        }
        s.field("row_offsets_and_sizes", &self.row_offsets_and_sizes)
            .finish()
    }
}

impl RowBuffer {

    pub fn new_with_row_sizes(
        initial_value: f64,
        row_sizes: impl AsRef<[usize]>,
        site: AllocSite,
    ) -> Result<Self> {
        let row_sizes = row_sizes.as_ref();
        let mut total_size: usize = 0;
        let mut row_offsets_and_sizes: Vec<(usize, usize)> = try_with_capacity(row_sizes.len(), site)?;
        for &size in row_sizes {
            row_offsets_and_sizes.push((total_size, size));
            total_size = total_size.checked_add(size)
                .ok_or(Error::OutOfMemory(site))?;
        }
        let buffer = try_alloc(initial_value, total_size, site)?;
        Ok(RowBuffer {
            buffer: buffer.into_boxed_slice(),
            row_offsets_and_sizes: row_offsets_and_sizes.into_boxed_slice(),
        })
    }

    /// `row_count` rows of `row_size` values each.
    pub fn new_with_uniform_rows(
        initial_value: f64,
        row_count: usize,
        row_size: usize,
        site: AllocSite,
    ) -> Result<Self> {
        row_count.checked_mul(row_size).ok_or(Error::OutOfMemory(site))?;
        let mut row_sizes = try_with_capacity(row_count, site)?;
        row_sizes.resize(row_count, row_size);
        Self::new_with_row_sizes(initial_value, row_sizes, site)
    }

    #[inline]
    pub fn get_row(&self, row: usize) -> &[f64] {
        let (offset, size) = self.row_offsets_and_sizes[row];
        &self.buffer[offset..offset + size]
    }

    #[inline]
    pub fn get_row_mut(&mut self, row: usize) -> &mut [f64] {
        let (offset, size) = self.row_offsets_and_sizes[row];
        &mut self.buffer[offset..offset + size]
    }

    /// Borrows an earlier row immutably and a later row mutably.
    #[inline]
    pub fn split_rows(&mut self, row_first: usize, row_second: usize) -> (&[f64], &mut [f64]) {
        assert!(row_first < row_second);
        let (offset_first, size_first) = self.row_offsets_and_sizes[row_first];
        let (offset_second, size_second) = self.row_offsets_and_sizes[row_second];
        let (head, tail) = self.buffer.split_at_mut(offset_second);
        (&head[offset_first..offset_first + size_first], &mut tail[..size_second])
    }

    /// Borrows an earlier row mutably and a later row immutably.
    #[inline]
    pub fn split_rows_rev(&mut self, row_first: usize, row_second: usize) -> (&mut [f64], &[f64]) {
        assert!(row_first < row_second);
        let (offset_first, size_first) = self.row_offsets_and_sizes[row_first];
        let (offset_second, size_second) = self.row_offsets_and_sizes[row_second];
        let (head, tail) = self.buffer.split_at_mut(offset_second);
        (&mut head[offset_first..offset_first + size_first], &tail[..size_second])
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.row_offsets_and_sizes.len()
    }

    #[inline]
    pub fn row_offsets_and_sizes(&self) -> &[(usize, usize)] {
        &self.row_offsets_and_sizes
    }

    #[inline]
    pub fn get_last_row(&self) -> &[f64] {
        self.get_row(self.num_rows() - 1)
    }

    pub fn copy_into(&self, target: &mut RowBuffer) {
        assert_eq!(self.row_offsets_and_sizes, target.row_offsets_and_sizes);
        target.buffer.copy_from_slice(&self.buffer);
    }

    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn get_buffer(&self) -> &[f64] {
        &self.buffer
    }

    #[inline]
    pub fn get_buffer_mut(&mut self) -> &mut [f64] {
        &mut self.buffer
    }

}


#[cfg(test)]
mod test {
    use super::*;

    fn new_buf(sizes: &[usize]) -> RowBuffer {
        RowBuffer::new_with_row_sizes(0.0, sizes, AllocSite::Weights).unwrap()
    }

    #[test]
    fn test_row_sizes_types() {
        RowBuffer::new_with_row_sizes(0.0, vec![1, 2, 3], AllocSite::Weights).unwrap();
        RowBuffer::new_with_row_sizes(0.0, &vec![1, 2, 3], AllocSite::Weights).unwrap();
        RowBuffer::new_with_row_sizes(0.0, [1, 2, 3], AllocSite::Weights).unwrap();
        RowBuffer::new_with_row_sizes(0.0, &[1, 2, 3], AllocSite::Weights).unwrap();
    }

    #[test]
    fn test_empty_allowed() {
        let buf = new_buf(&[]);
        assert_eq!(buf.num_rows(), 0);
        assert_eq!(buf.buffer_len(), 0);
    }

    #[test]
    fn test_uniform_rows() {
        let buf = RowBuffer::new_with_uniform_rows(1.5, 3, 2, AllocSite::Deltas).unwrap();
        assert_eq!(buf.row_offsets_and_sizes(), &[(0, 2), (2, 2), (4, 2)]);
        assert!(buf.get_buffer().iter().all(|&v| v == 1.5));
        match RowBuffer::new_with_uniform_rows(0.0, usize::MAX / 2, 4, AllocSite::Deltas) {
            Err(Error::OutOfMemory(AllocSite::Deltas)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
        match RowBuffer::new_with_row_sizes(0.0, [usize::MAX, 1], AllocSite::Weights) {
            Err(Error::OutOfMemory(AllocSite::Weights)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_offsets() {
        let buf = new_buf(&[4, 0, 3, 2]);
        assert_eq!(buf.row_offsets_and_sizes(), &[(0, 4), (4, 0), (4, 3), (7, 2)]);
        assert_eq!(buf.buffer_len(), 9);
    }

    #[test]
    fn test_basics() {

        let mut buf = new_buf(&[1, 0, 10, 2]);

        assert_eq!(4, buf.num_rows());
        assert_eq!(1, buf.get_row(0).len());
        assert_eq!(0, buf.get_row(1).len());
        assert_eq!(10, buf.get_row_mut(2).len());
        assert_eq!(2, buf.get_last_row().len());

        for i in 0..buf.num_rows() {
            let row = buf.get_row_mut(i);
            for j in 0..row.len() {
                row[j] = (i * 10 + j) as f64;
            }
        }

        for i in 0..buf.num_rows() {
            let row = buf.get_row(i);
            for j in 0..row.len() {
                assert_eq!(row[j], (i * 10 + j) as f64);
            }
        }

        let mut buf2 = new_buf(&[1, 0, 10, 2]);
        buf.copy_into(&mut buf2);
        assert_eq!(buf.get_buffer(), buf2.get_buffer());
    }

    #[test]
    fn test_split_rows() {
        let mut buf = new_buf(&[2, 3, 2]);
        for (i, element) in buf.get_buffer_mut().iter_mut().enumerate() {
            *element = i as f64;
        }
        let (first, last) = buf.split_rows(0, 2);
        assert_eq!(first, &[0., 1.]);
        assert_eq!(last, &[5., 6.]);
        last[0] = first[1];
        assert_eq!(buf.get_row(2), &[1., 6.]);

        let (first, middle) = buf.split_rows_rev(0, 1);
        first[1] = middle[2];
        assert_eq!(buf.get_row(0), &[0., 4.]);
    }

    #[test]
    #[should_panic]
    fn test_copy_into_mismatched_layout() {
        let buf = new_buf(&[2, 3]);
        let mut other = new_buf(&[3, 2]);
        buf.copy_into(&mut other);
    }

}
