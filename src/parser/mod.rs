//! Link discovery in the cached source page.
//!
//! Extraction is line-oriented pattern matching rather than DOM parsing:
//! only absolute `http(s)` URLs that end in `.pdf` (optionally followed by a
//! query string) are collected.
//!
//! # Example
//!
//! ```
//! use pdfharvest_core::parser::extract_pdf_links;
//!
//! let links = extract_pdf_links("<a href=\"https://example.com/sds/acetone.pdf\">SDS</a>");
//! assert_eq!(links, vec!["https://example.com/sds/acetone.pdf".to_string()]);
//! ```

mod links;

pub use links::extract_pdf_links;
