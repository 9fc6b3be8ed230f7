// Hashtag frequency bar chart.

use std::collections::HashMap;

use super::figure::{Figure, Trace};
use crate::posts::Post;

/// How many hashtags the chart shows.
pub const TOP_HASHTAGS: usize = 10;

/// The `n` most frequent hashtags across all posts, count descending.
/// Equal counts keep the order in which the hashtags were first seen.
pub fn top_hashtags(posts: &[Post], n: usize) -> Vec<(String, usize)> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for tag in posts.iter().flat_map(Post::hashtags) {
        let count = counts.entry(tag).or_insert(0);
        if *count == 0 {
            first_seen.push(tag);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|tag| (tag.to_string(), counts[tag]))
        .collect();
    // Stable: ties stay in first-seen order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

pub fn hashtag_chart(posts: &[Post]) -> Figure {
    let ranked = top_hashtags(posts, TOP_HASHTAGS);
    let tags: Vec<String> = ranked.iter().map(|(tag, _)| tag.clone()).collect();
    let mut fig = Figure::new("Top 10 Hashtag Frequency Distribution", "Hashtags", "Frequency");
    fig.data.push(
        Trace::bar(tags.clone(), ranked.iter().map(|(_, c)| *c as u64).collect())
            .with_inside_text(tags),
    );
    fig
}
