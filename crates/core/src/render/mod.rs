//! Server-side HTML for the storefront and the preview modal.

/// Preview modal markup.
pub mod modal;
/// Storefront page markup.
pub mod page;
/// Sequential poster fallback.
pub mod poster;

pub use modal::render_modal;
pub use page::{render_load_failure, render_storefront};
pub use poster::PosterChain;

/// Escape text for use in element content and quoted attributes.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
