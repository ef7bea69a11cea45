use unicode_normalization::UnicodeNormalization;

/// Prepare extracted resume text for ranking.
///
/// Applies NFKC so compatibility forms left by PDF extraction (ligatures such as
/// "ﬁ", full-width letters) compare equal to their plain spelling. Layout and
/// whitespace are left untouched; section detection depends on them.
pub fn prepare_text(raw: &str) -> String {
    raw.nfkc().collect()
}

/// Decode raw document bytes, replacing invalid UTF-8 sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    prepare_text(&String::from_utf8_lossy(bytes))
}
