// Likes and retweets over time: the annotated engagement chart and the
// plain time-series chart share one date-sorted timeline.

use chrono::{DateTime, FixedOffset, Utc};
use tracing::warn;

use super::figure::{Annotation, Axis, Figure, Legend, Title, Trace};
use crate::error::{DecodeError, Result};
use crate::posts::date::parse_post_date;
use crate::posts::Post;

/// One dated post on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    /// Index of the post in the corpus.
    pub index: usize,
    pub timestamp: DateTime<FixedOffset>,
    pub likes: u64,
    pub retweets: u64,
}

impl TimelinePoint {
    /// The x value Plotly plots, in UTC so the axis follows sort order
    /// whatever offset each post was written in.
    pub fn x(&self) -> String {
        self.timestamp
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Parse every post date and sort ascending. The sort is stable, so posts
/// with the same timestamp keep file order. Posts without a date are left
/// out; a date that does not parse is an error.
pub fn timeline(posts: &[Post]) -> Result<Vec<TimelinePoint>> {
    let mut points = Vec::with_capacity(posts.len());
    let mut undated = 0usize;

    for (index, post) in posts.iter().enumerate() {
        let Some(raw) = post.date.as_deref() else {
            undated += 1;
            continue;
        };
        let timestamp = parse_post_date(raw).map_err(|e| DecodeError::InvalidDate {
            index,
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
        points.push(TimelinePoint {
            index,
            timestamp,
            likes: post.likes(),
            retweets: post.retweets(),
        });
    }

    if undated > 0 {
        warn!(undated, "Posts without a date left out of time charts");
    }

    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

/// First point (in timeline order) holding the maximum of `metric`.
pub fn top_point<F>(points: &[TimelinePoint], metric: F) -> Option<&TimelinePoint>
where
    F: Fn(&TimelinePoint) -> u64,
{
    points.iter().fold(None, |best, p| match best {
        Some(b) if metric(b) >= metric(p) => Some(b),
        _ => Some(p),
    })
}

fn likes_and_retweets(title: &str, points: &[TimelinePoint]) -> Figure {
    let x: Vec<String> = points.iter().map(TimelinePoint::x).collect();
    let mut fig = Figure::new(title, "Date", "Count");
    fig.layout.xaxis = Axis {
        title: Title::new("Date"),
        kind: Some("date"),
    };
    fig.layout.legend = Some(Legend {
        title: Title::new("Metrics"),
    });
    fig.data.push(Trace::line(
        "like_count",
        x.clone(),
        points.iter().map(|p| p.likes).collect(),
    ));
    fig.data.push(Trace::line(
        "retweet_count",
        x,
        points.iter().map(|p| p.retweets).collect(),
    ));
    fig
}

/// Likes and retweets over time with callouts on the top liked and top
/// retweeted posts.
pub fn engagement_chart(points: &[TimelinePoint]) -> Figure {
    let mut fig = likes_and_retweets("Engagement Metrics: Likes and Retweets Over Time", points);

    if let Some(top) = top_point(points, |p| p.likes) {
        fig.layout.annotations.push(Annotation::callout(
            top.x(),
            top.likes,
            format!("Top Liked<br>{}", top.likes),
        ));
    }
    if let Some(top) = top_point(points, |p| p.retweets) {
        fig.layout.annotations.push(Annotation::callout(
            top.x(),
            top.retweets,
            format!("Top Retweeted<br>{}", top.retweets),
        ));
    }
    fig
}

/// The same two series as the engagement chart, without callouts.
pub fn time_series_chart(points: &[TimelinePoint]) -> Figure {
    likes_and_retweets("Time Series Analysis: Likes and Retweets Over Time", points)
}
