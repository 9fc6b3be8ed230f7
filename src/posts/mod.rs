// Post records: the unit of analysis read from the input JSON file.

pub mod date;
pub mod loader;

use serde::{Deserialize, Serialize};

/// One social-media post as it appears in the input file.
///
/// Fields other than `content` are kept exactly as read (including `null`)
/// so a post can be written back out unchanged. Use the accessor methods
/// for the normalised view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub content: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
    #[serde(default)]
    pub hashtags: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub media_url: Option<String>,
}

/// The posts of one run, in file order.
pub type Corpus = Vec<Post>;

impl Post {
    /// A post with just text, handy for tests and single-text prediction.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            date: None,
            like_count: None,
            retweet_count: None,
            hashtags: None,
            media_url: None,
        }
    }

    pub fn likes(&self) -> u64 {
        self.like_count.unwrap_or(0)
    }

    pub fn retweets(&self) -> u64 {
        self.retweet_count.unwrap_or(0)
    }

    /// Hashtags with `null` and empty entries dropped, in post order.
    pub fn hashtags(&self) -> impl Iterator<Item = &str> {
        self.hashtags
            .iter()
            .flatten()
            .filter_map(|tag| tag.as_deref())
            .filter(|tag| !tag.is_empty())
    }
}
