// Plotly figure model and the HTML page that hosts it.
//
// Only the handful of Plotly attributes the four charts use are modelled.
// The figure is serialized as JSON into a page that loads plotly.js and
// calls Plotly.newPlot, the same shape Plotly's own write_html produces.

use serde::Serialize;

/// plotly.js build referenced by every page.
pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<String>,
    pub y: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
}

impl Trace {
    /// A line with point markers.
    pub fn line(name: impl Into<String>, x: Vec<String>, y: Vec<u64>) -> Self {
        Self {
            kind: TraceKind::Scatter,
            name: Some(name.into()),
            x,
            y,
            mode: Some("lines+markers"),
            text: None,
            textposition: None,
        }
    }

    pub fn bar(x: Vec<String>, y: Vec<u64>) -> Self {
        Self {
            kind: TraceKind::Bar,
            name: None,
            x,
            y,
            mode: None,
            text: None,
            textposition: None,
        }
    }

    /// Print `text` inside each bar.
    pub fn with_inside_text(mut self, text: Vec<String>) -> Self {
        self.text = Some(text);
        self.textposition = Some("inside");
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

/// A callout arrow pointing at one data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: String,
    pub y: u64,
    pub text: String,
    pub showarrow: bool,
    pub arrowhead: u8,
    pub ax: i32,
    pub ay: i32,
}

impl Annotation {
    /// Arrow straight down onto (x, y) from 40px above.
    pub fn callout(x: impl Into<String>, y: u64, text: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y,
            text: text.into(),
            showarrow: true,
            arrowhead: 2,
            ax: 0,
            ay: -40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(title: &str, x_title: &str, y_title: &str) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                title: Title::new(title),
                xaxis: Axis {
                    title: Title::new(x_title),
                    kind: None,
                },
                yaxis: Axis {
                    title: Title::new(y_title),
                    kind: None,
                },
                legend: None,
                annotations: Vec::new(),
            },
        }
    }

    /// Render the figure as a standalone HTML page.
    pub fn to_html(&self) -> Result<String, serde_json::Error> {
        let figure_json = escape_for_script(&serde_json::to_string(self)?);
        let title = escape_html(&self.layout.title.text);
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{PLOTLY_JS_URL}" charset="utf-8"></script>
</head>
<body>
<div id="chart" style="height:100vh; width:100%;"></div>
<script type="text/javascript">
var figure = {figure_json};
Plotly.newPlot("chart", figure.data, figure.layout, {{"responsive": true}});
</script>
</body>
</html>
"#
        ))
    }
}

/// Keep user text (hashtags, labels) from closing the script element early.
fn escape_for_script(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
