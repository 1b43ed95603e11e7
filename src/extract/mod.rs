//! Plain-text extraction from uploaded documents.

mod pdf;

pub use pdf::{extract_pdf_text, is_pdf_filename};
