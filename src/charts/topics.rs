// Topic distribution bar chart: posts per labelled topic.

use super::figure::{Figure, Trace};
use crate::topics::{ClusterId, TopicModel};

/// (cluster id, label, post count), count descending, ties by cluster id.
pub fn topic_distribution(model: &TopicModel) -> Vec<(ClusterId, String, usize)> {
    let mut rows: Vec<(ClusterId, String, usize)> = model
        .counts()
        .into_iter()
        .map(|(id, count)| {
            let label = model
                .label(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("topic {id}"));
            (id, label, count)
        })
        .collect();
    rows.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    rows
}

pub fn topic_chart(model: &TopicModel) -> Figure {
    let rows = topic_distribution(model);
    let mut fig = Figure::new("Topic Classification Distribution", "Topic", "Number of Articles");
    fig.data.push(Trace::bar(
        rows.iter().map(|(_, label, _)| label.clone()).collect(),
        rows.iter().map(|(_, _, count)| *count as u64).collect(),
    ));
    fig
}
