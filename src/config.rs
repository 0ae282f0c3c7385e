//! Application-level configuration constants.

/// Product search service queried by the Search page.
pub const SEARCH_ENDPOINT: &str = "/api/product-search";

/// Upper bound on hits requested per search.
pub const SEARCH_HITS_PER_PAGE: u32 = 20;

/// Host page origins allowed to drive the embedding bridge. The widget's
/// own origin is always accepted in addition to this list.
pub const ALLOWED_EMBED_ORIGINS: &[&str] = &[
    "https://upcart.shop",
    "https://widget.upcart.shop",
];
