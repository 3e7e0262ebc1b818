pub mod document;
#[cfg(test)]
pub mod test_support;
pub mod toc;

pub use document::PdfDocument;
