use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
}

/// Pager metadata for list endpoints. Built through [`PageMeta::clamped`],
/// which also resolves the effective page number: out-of-range requests land
/// on the last valid page instead of erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageMeta {
    /// Resolve the effective page for `total` records. Pages are 1-indexed;
    /// requests below 1 clamp to the first page and requests beyond the end
    /// clamp to the last. An empty result set still has one (empty) page.
    pub fn clamped(requested_page: i64, total: i64, page_size: i64) -> Self {
        let total_pages = if total <= 0 {
            1
        } else {
            (total + page_size - 1) / page_size
        };
        let page = requested_page.clamp(1, total_pages);

        Self {
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    /// SQL OFFSET for the resolved page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl Meta {
    pub fn total(total: i64) -> Self {
        Self {
            total,
            pagination: None,
        }
    }

    pub fn paginated(total: i64, page: PageMeta) -> Self {
        Self {
            total,
            pagination: Some(page),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_first_page() {
        let meta = PageMeta::clamped(1, 30, 12);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_previous);
        assert_eq!(meta.offset(), 0);
    }

    #[test]
    fn test_clamped_exact_boundary() {
        // 24 records at 12 per page is exactly 2 pages
        let meta = PageMeta::clamped(2, 24, 12);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.page, 2);
        assert!(!meta.has_next);
        assert!(meta.has_previous);
        assert_eq!(meta.offset(), 12);
    }

    #[test]
    fn test_clamped_past_end_returns_last_page() {
        let meta = PageMeta::clamped(99, 30, 12);
        assert_eq!(meta.page, 3);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_clamped_below_one_returns_first_page() {
        let meta = PageMeta::clamped(0, 30, 12);
        assert_eq!(meta.page, 1);

        let meta = PageMeta::clamped(-5, 30, 12);
        assert_eq!(meta.page, 1);
    }

    #[test]
    fn test_clamped_empty_result_set() {
        let meta = PageMeta::clamped(7, 0, 12);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next);
        assert!(!meta.has_previous);
    }
}
