//! Track keywords for the filtered feed.

/// Most keywords sent in one filter request.
pub const MAX_KEYWORDS: usize = 16;
/// Longest keyword accepted, in characters.
pub const MAX_KEYWORD_LEN: usize = 60;

/// Validated, ordered keyword list. Over-limit input is dropped with a warning, never fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordList {
    keywords: Vec<String>,
}

impl KeywordList {
    /// Keep keywords in the order given, skipping empty and over-long ones,
    /// and stop once `MAX_KEYWORDS` have been kept.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keywords = Vec::new();
        let mut ignored = 0usize;
        for keyword in args {
            let keyword = keyword.into();
            if keywords.len() == MAX_KEYWORDS {
                ignored += 1;
                continue;
            }
            let len = keyword.chars().count();
            if len == 0 {
                tracing::warn!("ignoring empty track keyword");
                continue;
            }
            if len > MAX_KEYWORD_LEN {
                tracing::warn!(
                    "ignoring track keyword of {} characters (limit {}): {:?}",
                    len,
                    MAX_KEYWORD_LEN,
                    keyword
                );
                continue;
            }
            keywords.push(keyword);
        }
        if ignored > 0 {
            tracing::warn!(
                "ignoring {} track keyword(s) beyond the limit of {}",
                ignored,
                MAX_KEYWORDS
            );
        }
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    /// Comma-joined form carried in the `track` body parameter.
    pub fn joined(&self) -> String {
        self.keywords.join(",")
    }
}
