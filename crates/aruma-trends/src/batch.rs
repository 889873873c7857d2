//! Keyword batching.

/// Splits `keywords` into consecutive batches of at most `batch_size`,
/// preserving order. A zero batch size is treated as 1.
#[must_use]
pub fn batch_keywords(keywords: &[String], batch_size: usize) -> std::slice::Chunks<'_, String> {
    keywords.chunks(batch_size.max(1))
}
