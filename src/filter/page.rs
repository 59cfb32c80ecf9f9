use super::error::FilterError;

/// A 1-based page over a result set of fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Result<Self, FilterError> {
        if page < 1 {
            return Err(FilterError::InvalidPage(format!("page must be 1 or greater, got {}", page)));
        }
        if page_size < 1 {
            return Err(FilterError::InvalidLimit("page size must be positive".to_string()));
        }
        Ok(Self { page, page_size })
    }

    /// Parse the raw `page` query value; absent or blank means the first page
    pub fn parse(raw: Option<&str>, page_size: i64) -> Result<Self, FilterError> {
        let page = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => 1,
            Some(s) => s
                .parse::<i64>()
                .map_err(|_| FilterError::InvalidPage(format!("'{}' is not an integer", s)))?,
        };
        Self::new(page, page_size)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of items plus the total number of matching rows
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        total_pages(self.total_count, self.page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
        }
    }
}

impl<T: Clone> Page<T> {
    /// Slice an already-ordered, already-filtered sequence
    pub fn slice(rows: &[T], request: &PageRequest) -> Self {
        let total_count = rows.len() as i64;
        let items = rows
            .iter()
            .skip(request.offset().min(total_count) as usize)
            .take(request.page_size() as usize)
            .cloned()
            .collect();
        Page { items, total_count, page_size: request.page_size() }
    }
}

/// `ceil(total_count / page_size)`; zero when nothing matches
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 || page_size <= 0 {
        return 0;
    }
    let full = total_count / page_size;
    if total_count % page_size == 0 {
        full
    } else {
        full + 1
    }
}
