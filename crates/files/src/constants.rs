/// Size ceiling applied when the size-limit toggle is on (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions accepted by the basic upload control.
pub const BASIC_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Extensions accepted by the richer upload control.
pub const RICH_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xlsx", "md"];

/// MIME type used when neither content sniffing nor the extension table gives an answer.
pub(crate) const FALLBACK_MIME_TYPE: &str = "application/octet-stream";
