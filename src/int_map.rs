// src/int_map.rs

//! Compaction between a sparse "long" index domain (positions in the full
//! commit order) and a dense "short" one (rows actually shown).

use crate::error::{check_index, GraphError, Result};

pub trait IntToIntMap {
    fn short_size(&self) -> usize;

    fn long_size(&self) -> usize;

    /// Long index stored at `short_index`.
    fn get_long_index(&self, short_index: usize) -> Result<usize>;

    /// Largest short index whose long index is `<= long_index`, or `0` when
    /// there is none.
    fn get_short_index(&self, long_index: usize) -> Result<usize> {
        check_index(long_index, self.long_size())?;
        if self.short_size() == 0 || self.get_long_index(0)? > long_index {
            return Ok(0);
        }

        let mut a = 0;
        let mut b = self.short_size() - 1;
        while b > a + 1 {
            let middle = a + (b - a) / 2;
            if self.get_long_index(middle)? <= long_index {
                a = middle;
            } else {
                b = middle;
            }
        }

        if self.get_long_index(b)? <= long_index {
            Ok(b)
        } else {
            Ok(a)
        }
    }
}

/// Map backed by a strictly increasing list of long indices, one per short
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedIntToIntMap {
    breakpoints: Vec<usize>,
    long_size: usize,
}

impl SortedIntToIntMap {
    pub fn new(breakpoints: Vec<usize>, long_size: usize) -> Result<Self> {
        if let Some(pair) = breakpoints.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(GraphError::InvariantViolation(format!(
                "compaction breakpoints are not strictly increasing: {} then {}",
                pair[0], pair[1]
            )));
        }
        if let Some(&last) = breakpoints.last() {
            if last >= long_size {
                return Err(GraphError::InvariantViolation(format!(
                    "compaction breakpoint {} exceeds long size {}",
                    last, long_size
                )));
            }
        }
        Ok(Self { breakpoints, long_size })
    }

    /// Every long index maps to itself.
    pub fn identity(size: usize) -> Self {
        Self { breakpoints: (0..size).collect(), long_size: size }
    }

    /// Short indices enumerate the positions of `true` flags.
    pub fn from_flags(visible: &[bool]) -> Self {
        let breakpoints = visible
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
            .collect();
        Self { breakpoints, long_size: visible.len() }
    }

    /// Exact inverse of `get_long_index`, `None` when `long_index` is not
    /// one of the breakpoints.
    pub fn short_index_of(&self, long_index: usize) -> Option<usize> {
        self.breakpoints.binary_search(&long_index).ok()
    }

    pub fn breakpoints(&self) -> &[usize] {
        &self.breakpoints
    }
}

impl IntToIntMap for SortedIntToIntMap {
    fn short_size(&self) -> usize {
        self.breakpoints.len()
    }

    fn long_size(&self) -> usize {
        self.long_size
    }

    fn get_long_index(&self, short_index: usize) -> Result<usize> {
        check_index(short_index, self.breakpoints.len())?;
        Ok(self.breakpoints[short_index])
    }
}
