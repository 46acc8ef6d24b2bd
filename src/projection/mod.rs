pub mod filter;
pub mod page;
pub mod sort;

pub use filter::ItemFilter;
pub use page::{Page, paginate};
pub use sort::SortOrder;
