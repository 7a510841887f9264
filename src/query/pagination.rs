/// Pagination state as the view layer consumes it: `current` is 1-based for
/// display and translated to a 0-based `page` parameter on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            current: 1,
            page_size,
            total_pages: 0,
            total_elements: 0,
        }
    }

    pub fn server_page(&self) -> u32 {
        self.current.saturating_sub(1)
    }

    pub fn has_next_page(&self) -> bool {
        self.total_pages > 0 && self.server_page() < self.total_pages - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_page_is_zero_based_and_clamped() {
        let mut pagination = Pagination::new(20);
        assert_eq!(pagination.server_page(), 0);
        pagination.current = 0;
        assert_eq!(pagination.server_page(), 0);
        pagination.current = 5;
        assert_eq!(pagination.server_page(), 4);
    }

    #[test]
    fn next_page_detection() {
        let mut pagination = Pagination::new(20);
        assert!(!pagination.has_next_page());
        pagination.total_pages = 3;
        assert!(pagination.has_next_page());
        pagination.current = 3;
        assert!(!pagination.has_next_page());
    }
}
