// Colored terminal output for topic summaries and predictions.
//
// main.rs delegates all user-facing formatting here; library code only
// logs through tracing.

use std::path::PathBuf;

use colored::Colorize;

use crate::charts::topics::topic_distribution;
use crate::classify::traits::Prediction;
use crate::pipeline::classify::ClassifiedPost;
use crate::topics::TopicModel;

/// Display topics as a bar chart of their share of the corpus.
pub fn display_topic_summary(model: &TopicModel) {
    let total = model.assignments.len();
    println!(
        "\n{}",
        format!(
            "=== Topics ({} posts, {} terms) ===",
            total,
            model.vocabulary.len()
        )
        .bold()
    );
    println!();

    let bar_width: usize = 20;

    for (id, label, count) in topic_distribution(model) {
        let share = if total > 0 {
            count as f64 / total as f64
        } else {
            0.0
        };
        let filled = (share * bar_width as f64).round() as usize;
        let empty = bar_width.saturating_sub(filled);
        let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

        let colored_bar = if share >= 0.25 {
            bar.bright_green()
        } else if share >= 0.10 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>2}. {:<32} {} {:>4} posts",
            id.0,
            label.bold(),
            colored_bar,
            count
        );

        if let Some(topic) = model.topic(id) {
            let weights: Vec<String> = topic
                .terms
                .iter()
                .map(|t| format!("{} {:.3}", t.term, t.weight))
                .collect();
            println!("      Terms: {}", weights.join(", ").dimmed());
        }
    }
    println!();
}

/// List the chart files a run wrote.
pub fn display_written(paths: &[PathBuf]) {
    println!("{}", "Charts written:".bold());
    for path in paths {
        println!("  {}", path.display());
    }
}

/// Display one prediction.
pub fn display_prediction(prediction: &Prediction) {
    println!("The tweet belongs to:");
    println!("  Target:     {}", prediction.target.as_str().bold());
    println!("  Event Type: {}", prediction.event_type.as_str().bold());
    println!("  Label:      {}", prediction.label.as_str().bold());
}

/// Display a classified post with its original fields.
pub fn display_classified(post: &ClassifiedPost) {
    let hashtags: Vec<&str> = post
        .hashtags
        .iter()
        .flatten()
        .filter_map(|t| t.as_deref())
        .collect();

    println!("Content:    {}", super::truncate_chars(&post.content, 140));
    println!("Target:     {}", post.target.as_str().bold());
    println!("Event Type: {}", post.event_type.as_str().bold());
    println!("Label:      {}", post.label.as_str().bold());
    println!("Date:       {}", post.date.as_deref().unwrap_or("-").dimmed());
    println!(
        "Likes:      {}  Retweets: {}",
        post.like_count.unwrap_or(0),
        post.retweet_count.unwrap_or(0)
    );
    println!("Hashtags:   {}", hashtags.join(", ").dimmed());
    println!(
        "Media URL:  {}",
        post.media_url.as_deref().unwrap_or("-").dimmed()
    );
    println!();
}
