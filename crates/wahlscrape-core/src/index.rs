//! Municipality index and its position in the paginated listing.

use std::fmt;

/// 1-based index into the municipality listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MunicipalityIndex(u32);

impl MunicipalityIndex {
    /// `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// 1-based listing page.
    pub fn page(self, page_size: u32) -> u32 {
        (self.0 - 1) / page_size + 1
    }

    /// 1-based row on its page.
    pub fn row(self, page_size: u32) -> u32 {
        (self.0 - 1) % page_size + 1
    }

    /// Inverse of [`page`](Self::page) and [`row`](Self::row).
    pub fn from_position(page: u32, row: u32, page_size: u32) -> Option<Self> {
        if page == 0 || row == 0 || row > page_size {
            return None;
        }
        Self::new((page - 1) * page_size + row)
    }
}

impl fmt::Display for MunicipalityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rejected() {
        assert!(MunicipalityIndex::new(0).is_none());
    }

    #[test]
    fn test_page_and_row() {
        let idx = MunicipalityIndex::new(2501).unwrap();
        assert_eq!(idx.page(10), 251);
        assert_eq!(idx.row(10), 1);

        let idx = MunicipalityIndex::new(3175).unwrap();
        assert_eq!(idx.page(10), 318);
        assert_eq!(idx.row(10), 5);

        let idx = MunicipalityIndex::new(10).unwrap();
        assert_eq!(idx.page(10), 1);
        assert_eq!(idx.row(10), 10);
    }

    #[test]
    fn test_position_is_bijective_over_range() {
        let mut seen = std::collections::HashSet::new();
        for i in 1..=3175 {
            let idx = MunicipalityIndex::new(i).unwrap();
            let (page, row) = (idx.page(10), idx.row(10));
            assert_eq!(page, (i - 1) / 10 + 1);
            assert_eq!(row, (i - 1) % 10 + 1);
            assert!(seen.insert((page, row)));
            assert_eq!(MunicipalityIndex::from_position(page, row, 10), Some(idx));
        }
    }

    #[test]
    fn test_from_position_rejects_out_of_page() {
        assert!(MunicipalityIndex::from_position(1, 11, 10).is_none());
        assert!(MunicipalityIndex::from_position(0, 1, 10).is_none());
        assert!(MunicipalityIndex::from_position(2, 0, 10).is_none());
    }

    #[test]
    fn test_other_page_size() {
        let idx = MunicipalityIndex::new(26).unwrap();
        assert_eq!(idx.page(25), 2);
        assert_eq!(idx.row(25), 1);
    }
}
