//! Fixed-size, 1-based pagination over newest-first listings.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Items per page on every listing.
pub const PAGE_SIZE: usize = 4;

/// A validated page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: usize,
    num_pages: usize,
}

impl PageRequest {
    /// Resolves `number` against `total` items. Page 1 always exists, even for
    /// an empty listing; any other page outside `1..=num_pages` is not found.
    pub fn resolve(number: usize, total: usize) -> Result<Self> {
        let num_pages = total.div_ceil(PAGE_SIZE).max(1);
        if number == 0 || number > num_pages {
            return Err(DomainError::not_found("page", number));
        }
        Ok(PageRequest { number, num_pages })
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn limit(&self) -> usize {
        PAGE_SIZE
    }

    pub fn offset(&self) -> usize {
        (self.number - 1) * PAGE_SIZE
    }

    pub fn into_page<T>(self, items: Vec<T>, total: usize) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            total,
            has_previous: self.number > 1,
            has_next: self.number < self.num_pages,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}
