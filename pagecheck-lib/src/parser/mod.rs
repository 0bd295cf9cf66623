pub mod dom_indices;
pub mod page_html;
