//! Extension and size rules for candidate attachments.

use crate::constants::{BASIC_EXTENSIONS, MAX_FILE_SIZE_BYTES, RICH_EXTENSIONS};
use crate::{AttachmentError, AttachmentResult};
use serde::{Deserialize, Serialize};

/// Which extension allow-list an upload control uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionSet {
    /// `.pdf`, `.doc`, `.docx`
    #[default]
    Basic,
    /// Basic plus `.xlsx` and `.md`
    Rich,
}

impl ExtensionSet {
    /// Lowercase extensions (without the dot) accepted by this set.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ExtensionSet::Basic => BASIC_EXTENSIONS,
            ExtensionSet::Rich => RICH_EXTENSIONS,
        }
    }

    /// Human-readable list such as `.pdf, .doc, .docx`.
    pub fn describe(&self) -> String {
        self.extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rules applied to a candidate file before its bytes are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentPolicy {
    extensions: ExtensionSet,
    size_limit_enabled: bool,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self::new(ExtensionSet::Basic, true)
    }
}

impl AttachmentPolicy {
    pub fn new(extensions: ExtensionSet, size_limit_enabled: bool) -> Self {
        Self {
            extensions,
            size_limit_enabled,
        }
    }

    pub fn extensions(&self) -> ExtensionSet {
        self.extensions
    }

    pub fn size_limit_enabled(&self) -> bool {
        self.size_limit_enabled
    }

    /// Turns the 10 MB ceiling on or off.
    pub fn set_size_limit_enabled(&mut self, enabled: bool) {
        self.size_limit_enabled = enabled;
    }

    /// Validates a candidate by name and size.
    ///
    /// The extension is checked first, then the size (only while the limit is enabled).
    ///
    /// # Errors
    ///
    /// Returns `AttachmentError::MissingFilename`, `AttachmentError::UnsupportedExtension` or
    /// `AttachmentError::TooLarge`, whichever check fails first.
    pub fn check(&self, filename: &str, size: u64) -> AttachmentResult<()> {
        self.check_extension(filename)?;
        self.check_size(size)
    }

    /// Case-insensitive suffix match against the allow-list.
    pub fn check_extension(&self, filename: &str) -> AttachmentResult<()> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(AttachmentError::MissingFilename);
        }

        let lower = filename.to_ascii_lowercase();
        let allowed = self
            .extensions
            .extensions()
            .iter()
            .any(|ext| lower.ends_with(&format!(".{ext}")));

        if allowed {
            Ok(())
        } else {
            Err(AttachmentError::UnsupportedExtension {
                filename: filename.to_string(),
                allowed: self.extensions.describe(),
            })
        }
    }

    pub fn check_size(&self, size: u64) -> AttachmentResult<()> {
        if self.size_limit_enabled && size > MAX_FILE_SIZE_BYTES {
            return Err(AttachmentError::TooLarge {
                size,
                limit_mb: MAX_FILE_SIZE_BYTES / (1024 * 1024),
            });
        }
        Ok(())
    }
}
