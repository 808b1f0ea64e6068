// ********* Declarative figure description ***********
//
// The structures serialize to the JSON figure format understood by Plotly.
// Only the attributes used by the charts of this crate are modelled.

use serde::Serialize;
use std::collections::BTreeMap;

pub const FONT_FAMILY: &str = "Arial Black";
pub const TEMPLATE: &str = "seaborn";

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Font {
    pub family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Font {
    pub fn arial(size: u32) -> Font {
        Font {
            family: FONT_FAMILY.to_string(),
            size: Some(size),
            color: None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Default)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    // Pie slices take one color per label. Unstyled labels use the default palette.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<Option<String>>>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub marker: Marker,
    pub legendgroup: String,
    pub showlegend: bool,
    pub xaxis: String,
    pub yaxis: String,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct HistogramTrace {
    pub name: String,
    pub x: Vec<f64>,
    /// Number of rows for each entry of `x`, summed inside of the bins.
    pub y: Vec<f64>,
    pub histfunc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histnorm: Option<String>,
    pub nbinsx: u32,
    pub marker: Marker,
    pub legendgroup: String,
    pub showlegend: bool,
    pub xaxis: String,
    pub yaxis: String,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Domain {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct PieTrace {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub marker: Marker,
    pub textinfo: String,
    pub hoverinfo: String,
    pub textfont: Font,
    pub insidetextfont: Font,
    pub outsidetextfont: Font,
    /// Slices keep the order of `labels` rather than being sorted by size.
    pub sort: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Histogram(HistogramTrace),
    Pie(PieTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Bar(t) => &t.name,
            Trace::Histogram(t) => &t.name,
            Trace::Pie(t) => &t.name,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Title {
    pub fn new(text: String, size: u32) -> Title {
        Title {
            text,
            font: Font::arial(size),
            xref: None,
            yref: None,
            y: None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Legend {
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Default)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub xref: String,
    pub yref: String,
    pub xanchor: String,
    pub yanchor: String,
    pub showarrow: bool,
    pub font: Font,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub template: String,
    pub showlegend: bool,
    pub legend: Legend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    /// `xaxis`, `xaxis2`, ..., `yaxis`, `yaxis2`, ...
    #[serde(flatten)]
    pub axes: BTreeMap<String, Axis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Layout {
    pub fn new(title: Title) -> Layout {
        Layout {
            title,
            template: TEMPLATE.to_string(),
            showlegend: true,
            legend: Legend {
                font: Font::arial(13),
                title: None,
            },
            barmode: None,
            axes: BTreeMap::new(),
            annotations: Vec::new(),
            width: None,
            height: None,
        }
    }
}

/// A renderable chart.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing these structures cannot fail: all the map keys are strings.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// The category order imposed on an axis (`xaxis`, `xaxis2`, ...), if any.
    pub fn category_order(&self, axis: &str) -> Option<&[String]> {
        self.layout
            .axes
            .get(axis)
            .and_then(|a| a.categoryarray.as_deref())
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.data.iter().find(|t| t.name() == name)
    }

    pub fn trace_names(&self) -> Vec<&str> {
        self.data.iter().map(|t| t.name()).collect()
    }
}

/// Splits `[0, 1]` into `n` equal domains separated by `spacing`.
pub fn split_domains(n: usize, spacing: f64) -> Vec<[f64; 2]> {
    if n == 0 {
        return vec![];
    }
    let width = (1.0 - spacing * ((n - 1) as f64)) / (n as f64);
    (0..n)
        .map(|i| {
            let start = (i as f64) * (width + spacing);
            [start, start + width]
        })
        .collect()
}

/// Axis names as used in the traces (`x`, `x2`) and in the layout (`xaxis`, `xaxis2`).
pub fn axis_names(letter: char, idx: usize) -> (String, String) {
    if idx == 0 {
        (letter.to_string(), format!("{}axis", letter))
    } else {
        (
            format!("{}{}", letter, idx + 1),
            format!("{}axis{}", letter, idx + 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domains_cover_the_unit_interval() {
        let d = split_domains(3, 0.05);
        assert_eq!(d.len(), 3);
        assert!(d[0][0].abs() < 1e-9);
        assert!((d[2][1] - 1.0).abs() < 1e-9);
        assert!((d[1][0] - d[0][1] - 0.05).abs() < 1e-9);
        assert_eq!(split_domains(1, 0.05), vec![[0.0, 1.0]]);
    }

    #[test]
    fn axis_naming() {
        assert_eq!(axis_names('x', 0), ("x".to_string(), "xaxis".to_string()));
        assert_eq!(axis_names('y', 2), ("y3".to_string(), "yaxis3".to_string()));
    }

    #[test]
    fn traces_serialize_with_their_type() {
        let fig = Figure {
            data: vec![Trace::Bar(BarTrace {
                name: "Dem".to_string(),
                x: vec!["F".to_string()],
                y: vec![3.0],
                marker: Marker {
                    color: Some("blue".to_string()),
                    colors: None,
                },
                legendgroup: "Dem".to_string(),
                showlegend: true,
                xaxis: "x".to_string(),
                yaxis: "y".to_string(),
            })],
            layout: Layout::new(Title::new("t".to_string(), 24)),
        };
        let js = fig.to_json();
        assert_eq!(js["data"][0]["type"], "bar");
        assert_eq!(js["data"][0]["marker"]["color"], "blue");
        assert_eq!(js["layout"]["template"], "seaborn");
        assert!(js["layout"].get("barmode").is_none());
        assert!(js["layout"].get("annotations").is_none());
    }

    #[test]
    fn axes_are_flattened_into_the_layout() {
        let mut layout = Layout::new(Title::new("t".to_string(), 24));
        layout.axes.insert(
            "xaxis2".to_string(),
            Axis {
                categoryorder: Some("array".to_string()),
                categoryarray: Some(vec!["a".to_string()]),
                ..Default::default()
            },
        );
        let js = serde_json::to_value(&layout).unwrap();
        assert_eq!(js["xaxis2"]["categoryarray"][0], "a");
    }
}
