use serde::Serialize;

use crate::core::Item;

/// One page of a projected view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<Item>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice an ordered sequence into a page.
///
/// `total_pages = max(1, ceil(n / page_size))` and the requested page is
/// clamped into `[1, total_pages]`, so out-of-range requests (including 0)
/// always yield a valid page. A `page_size` of zero is treated as one; the
/// view layer calls this on every filter change and must not be able to
/// take the store down.
pub fn paginate(items: &[Item], page_size: usize, requested_page: usize) -> Page {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = usize::max(1, total_items.div_ceil(page_size));
    let page = requested_page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = usize::min(start + page_size, total_items);
    let items = if start < total_items {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}
