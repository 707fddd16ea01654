use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

// ---------------------------------------------------------------------------
// Row identifier extraction
// ---------------------------------------------------------------------------

/// How a row ID is derived from the path-like field the tools export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdRule {
    /// POSIX basename, extension stripped, then the segment after the last
    /// backslash. Values without a backslash have no ID under this rule.
    ///
    /// This matches how existing score files were keyed, which is why it
    /// stays the default even though it only works for Windows-style paths.
    #[default]
    Backslash,
    /// Last component under either separator, extension stripped.
    Portable,
}

impl IdRule {
    pub fn extract(self, raw: &str) -> Result<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScoreError::IdNotExtractable(raw.to_string()));
        }
        let id = match self {
            IdRule::Backslash => {
                let base = raw.rsplit('/').next().unwrap_or(raw);
                let stem = strip_extension(base);
                match stem.rsplit_once('\\') {
                    Some((_, last)) => last,
                    None => return Err(ScoreError::IdNotExtractable(raw.to_string())),
                }
            }
            IdRule::Portable => {
                let last = raw
                    .split(['/', '\\'])
                    .filter(|s| !s.is_empty())
                    .last()
                    .unwrap_or(raw);
                strip_extension(last)
            }
        };
        if id.is_empty() {
            return Err(ScoreError::IdNotExtractable(raw.to_string()));
        }
        Ok(id.to_string())
    }
}

/// Remove a trailing `.ext`; a leading dot (`.hidden`) is not an extension.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}
