use log::{debug, info};
use std::collections::HashSet;

use crate::aggregate::*;
use crate::categories::*;
use crate::config::*;
use crate::figure::*;
use crate::table::VoterTable;

const TITLE_SIZE: u32 = 24;
const AXIS_TITLE_SIZE: u32 = 18;
const TICK_SIZE: u32 = 15;
const LEGEND_SIZE: u32 = 13;
const PIE_TEXT_SIZE: u32 = 15;
const PANEL_TITLE_SIZE: u32 = 18;

const FACET_SPACING: f64 = 0.05;
const FACET_WIDTH: u32 = 1000;
const PIE_GRID_WIDTH: u32 = 900;
const GRID_HEIGHT: u32 = 450;

fn axis_title(text: &str) -> Option<Title> {
    Some(Title::new(text.to_string(), AXIS_TITLE_SIZE))
}

fn category_axis(title: Option<Title>, meta: &CategoryMetadata, field: Field) -> Axis {
    let order = meta.order(field);
    Axis {
        title,
        tickfont: Some(Font::arial(TICK_SIZE)),
        categoryorder: if order.is_empty() {
            None
        } else {
            Some("array".to_string())
        },
        categoryarray: if order.is_empty() {
            None
        } else {
            Some(order.to_vec())
        },
        ..Default::default()
    }
}

fn value_axis(title: Option<Title>) -> Axis {
    Axis {
        title,
        tickfont: Some(Font::arial(TICK_SIZE)),
        ..Default::default()
    }
}

fn bar_marker(meta: &CategoryMetadata, field: Field, value: &str) -> Marker {
    Marker {
        color: meta.color(field, value).map(|s| s.to_string()),
        colors: None,
    }
}

fn parse_numbers(values: &[String]) -> Vec<f64> {
    values
        .iter()
        .map(|v| v.parse::<f64>().unwrap_or(f64::NAN))
        .collect()
}

/// One trace per value of `color`, each spanning the values of `x`.
///
/// In percent mode every trace is normalized to its own total, which is the
/// share of each `x` category among the rows of that color.
fn grouped_traces(
    table: &VoterTable,
    year: Option<u16>,
    x: Field,
    color: Field,
    norm: Normalization,
    panel: usize,
    shown_in_legend: &mut HashSet<String>,
) -> Result<Vec<Trace>, ChartError> {
    let agg = count_pair(table, year, color, x, norm == Normalization::Percent)?;
    let meta = CategoryMetadata::resolve(&[x, color]);
    let (xaxis, _) = axis_names('x', panel);
    let (yaxis, _) = axis_names('y', panel);

    let mut traces: Vec<Trace> = Vec::new();
    for c in agg.primary_values() {
        let rows: Vec<&GroupCount> = agg.rows.iter().filter(|r| r.primary == c).collect();
        let xs: Vec<String> = rows
            .iter()
            .filter_map(|r| r.secondary.clone())
            .collect();
        let ys: Vec<f64> = rows
            .iter()
            .map(|r| match norm {
                Normalization::Count => r.count as f64,
                Normalization::Percent => r.percent.unwrap_or(0.0),
            })
            .collect();
        let showlegend = shown_in_legend.insert(c.clone());
        let marker = bar_marker(&meta, color, &c);
        let trace = if x.is_continuous() {
            // The counts are binned by the renderer; normalization is applied there too.
            Trace::Histogram(HistogramTrace {
                name: c.clone(),
                x: parse_numbers(&xs),
                y: rows.iter().map(|r| r.count as f64).collect(),
                histfunc: "sum".to_string(),
                histnorm: match norm {
                    Normalization::Count => None,
                    Normalization::Percent => Some("percent".to_string()),
                },
                nbinsx: CONTINUOUS_BINS,
                marker,
                legendgroup: c.clone(),
                showlegend,
                xaxis: xaxis.clone(),
                yaxis: yaxis.clone(),
            })
        } else {
            Trace::Bar(BarTrace {
                name: c.clone(),
                x: xs,
                y: ys,
                marker,
                legendgroup: c.clone(),
                showlegend,
                xaxis: xaxis.clone(),
                yaxis: yaxis.clone(),
            })
        };
        traces.push(trace);
    }
    Ok(traces)
}

fn bar_layout(
    title: String,
    meta: &CategoryMetadata,
    x: Field,
    norm: Normalization,
) -> Result<Layout, ChartError> {
    let mut layout = Layout::new(Title::new(title, TITLE_SIZE));
    layout.legend.title = Some(Title::new(String::new(), LEGEND_SIZE));
    layout.axes.insert(
        "xaxis".to_string(),
        category_axis(axis_title(meta.label(x)?), meta, x),
    );
    layout.axes.insert(
        "yaxis".to_string(),
        value_axis(axis_title(norm.y_axis_title())),
    );
    Ok(layout)
}

/// Distribution of a single field for one election year.
///
/// ```
/// use turnout_charts::*;
///
/// let table = VoterTable::from_records(vec![
///     VoterRecord::new(2020).with(Field::Voted, "N"),
///     VoterRecord::new(2020).with(Field::Voted, "Y"),
/// ]);
/// let fig = basic_hist(&table, 2020, Field::Voted)?;
/// assert_eq!(fig.trace_names(), vec!["Y", "N"]);
/// # Ok::<(), ChartError>(())
/// ```
pub fn basic_hist(table: &VoterTable, year: u16, field: Field) -> Result<Figure, ChartError> {
    info!("basic_hist: year: {} field: {}", year, field);
    let meta = CategoryMetadata::resolve(&[field]);
    let label = meta.label(field)?;
    let agg = count_single(table, Some(year), field)?;

    let data: Vec<Trace> = if field.is_continuous() {
        let xs: Vec<String> = agg.rows.iter().map(|r| r.primary.clone()).collect();
        vec![Trace::Histogram(HistogramTrace {
            name: label.to_string(),
            x: parse_numbers(&xs),
            y: agg.rows.iter().map(|r| r.count as f64).collect(),
            histfunc: "sum".to_string(),
            histnorm: None,
            nbinsx: CONTINUOUS_BINS,
            marker: Marker {
                color: Some(CONTINUOUS_COLOR.to_string()),
                colors: None,
            },
            legendgroup: label.to_string(),
            showlegend: false,
            xaxis: "x".to_string(),
            yaxis: "y".to_string(),
        })]
    } else {
        agg.rows
            .iter()
            .map(|r| {
                Trace::Bar(BarTrace {
                    name: r.primary.clone(),
                    x: vec![r.primary.clone()],
                    y: vec![r.count as f64],
                    marker: bar_marker(&meta, field, &r.primary),
                    legendgroup: r.primary.clone(),
                    showlegend: false,
                    xaxis: "x".to_string(),
                    yaxis: "y".to_string(),
                })
            })
            .collect()
    };

    let mut layout = bar_layout(
        format!("Distribution of {} <br> in {} General Election", label, year),
        &meta,
        field,
        Normalization::Count,
    )?;
    layout.legend.title = None;
    layout.showlegend = false;
    Ok(Figure { data, layout })
}

/// Distribution of `field_a` for one election year, split by the values of `field_b`.
pub fn grp_hist(
    table: &VoterTable,
    year: u16,
    field_a: Field,
    field_b: Field,
    norm: Normalization,
    bar_mode: BarMode,
) -> Result<Figure, ChartError> {
    info!(
        "grp_hist: year: {} fields: {} x {} norm: {:?} bar_mode: {:?}",
        year, field_a, field_b, norm, bar_mode
    );
    let color = color_field(field_b);
    let meta = CategoryMetadata::resolve(&[field_a, color]);
    let title = format!(
        "{} by {} <br> in {} General Election",
        meta.label(field_a)?,
        meta.label(color)?,
        year
    );
    let data = grouped_traces(
        table,
        Some(year),
        field_a,
        color,
        norm,
        0,
        &mut HashSet::new(),
    )?;
    let mut layout = bar_layout(title, &meta, field_a, norm)?;
    layout.barmode = Some(bar_mode.as_str().to_string());
    Ok(Figure { data, layout })
}

/// Stacked bars of `field_a` split by `field_b`, for one election year.
///
/// In percent mode each bar adds up to 100: the segments are the share of each
/// `field_b` value among the rows of that `field_a` value.
pub fn stack_grp_hist(
    table: &VoterTable,
    year: u16,
    field_a: Field,
    field_b: Field,
    norm: Normalization,
) -> Result<Figure, ChartError> {
    info!(
        "stack_grp_hist: year: {} fields: {} x {} norm: {:?}",
        year, field_a, field_b, norm
    );
    let color = color_field(field_b);
    let meta = CategoryMetadata::resolve(&[field_a, color]);
    let title = format!(
        "{} by {} <br> in {} General Election",
        meta.label(field_a)?,
        meta.label(color)?,
        year
    );
    let agg = count_pair(
        table,
        Some(year),
        field_a,
        color,
        norm == Normalization::Percent,
    )?;

    let mut data: Vec<Trace> = Vec::new();
    for c in agg.secondary_values(&meta) {
        let rows: Vec<&GroupCount> = agg
            .rows
            .iter()
            .filter(|r| r.secondary.as_deref() == Some(c.as_str()))
            .collect();
        data.push(Trace::Bar(BarTrace {
            name: c.clone(),
            x: rows.iter().map(|r| r.primary.clone()).collect(),
            y: rows
                .iter()
                .map(|r| match norm {
                    Normalization::Count => r.count as f64,
                    Normalization::Percent => r.percent.unwrap_or(0.0),
                })
                .collect(),
            marker: bar_marker(&meta, color, &c),
            legendgroup: c.clone(),
            showlegend: true,
            xaxis: "x".to_string(),
            yaxis: "y".to_string(),
        }));
    }
    let mut layout = bar_layout(title, &meta, field_a, norm)?;
    layout.barmode = Some(BarMode::Stack.as_str().to_string());
    Ok(Figure { data, layout })
}

/// Distribution of a single field, with one color per election year.
pub fn grp_yr_hist(
    table: &VoterTable,
    field: Field,
    norm: Normalization,
    bar_mode: BarMode,
) -> Result<Figure, ChartError> {
    info!(
        "grp_yr_hist: field: {} norm: {:?} bar_mode: {:?}",
        field, norm, bar_mode
    );
    let meta = CategoryMetadata::resolve(&[field, Field::Year]);
    let title = format!(
        "{} by {}",
        meta.label(field)?,
        meta.label(Field::Year)?
    );
    let data = grouped_traces(
        table,
        None,
        field,
        Field::Year,
        norm,
        0,
        &mut HashSet::new(),
    )?;
    let mut layout = bar_layout(title, &meta, field, norm)?;
    layout.barmode = Some(bar_mode.as_str().to_string());
    Ok(Figure { data, layout })
}

/// One panel per election year, each showing `field_a` split by `field_b`.
pub fn multi_yr_hist(
    table: &VoterTable,
    field_a: Field,
    field_b: Field,
    norm: Normalization,
    bar_mode: BarMode,
) -> Result<Figure, ChartError> {
    info!(
        "multi_yr_hist: fields: {} x {} norm: {:?} bar_mode: {:?}",
        field_a, field_b, norm, bar_mode
    );
    let color = color_field(field_b);
    let meta = CategoryMetadata::resolve(&[field_a, color]);
    let label_a = meta.label(field_a)?;
    let title = format!(
        "{} by {} in General Elections",
        label_a,
        meta.label(color)?
    );

    let years = table.years();
    let domains = split_domains(years.len(), FACET_SPACING);
    let mut layout = Layout::new(Title::new(title, TITLE_SIZE));
    layout.legend.title = Some(Title::new(String::new(), LEGEND_SIZE));
    layout.barmode = Some(bar_mode.as_str().to_string());
    layout.width = Some(FACET_WIDTH);
    layout.height = Some(GRID_HEIGHT);

    let mut data: Vec<Trace> = Vec::new();
    let mut shown: HashSet<String> = HashSet::new();
    for (idx, (year, domain)) in years.iter().zip(domains.iter()).enumerate() {
        debug!("multi_yr_hist: panel {} year {}", idx, year);
        data.extend(grouped_traces(
            table,
            Some(*year),
            field_a,
            color,
            norm,
            idx,
            &mut shown,
        )?);

        let (x_ref, x_name) = axis_names('x', idx);
        let (y_ref, y_name) = axis_names('y', idx);
        // Only the middle panel names the x axis, only the first one the y axis.
        let x_title = if idx == years.len() / 2 {
            axis_title(label_a)
        } else {
            None
        };
        let mut x_axis = category_axis(x_title, &meta, field_a);
        x_axis.domain = Some(*domain);
        x_axis.anchor = Some(y_ref);
        layout.axes.insert(x_name, x_axis);

        let y_title = if idx == 0 {
            axis_title(norm.y_axis_title())
        } else {
            None
        };
        let mut y_axis = value_axis(y_title);
        y_axis.anchor = Some(x_ref);
        if idx > 0 {
            y_axis.matches = Some("y".to_string());
        }
        layout.axes.insert(y_name, y_axis);

        layout
            .annotations
            .push(panel_title(year.to_string(), (domain[0] + domain[1]) / 2.0, 1.0));
    }
    Ok(Figure { data, layout })
}

fn panel_title(text: String, x: f64, y: f64) -> Annotation {
    Annotation {
        text,
        x,
        y,
        xref: "paper".to_string(),
        yref: "paper".to_string(),
        xanchor: "center".to_string(),
        yanchor: "bottom".to_string(),
        showarrow: false,
        font: Font::arial(PANEL_TITLE_SIZE),
    }
}

fn pie_trace(
    name: String,
    meta: &CategoryMetadata,
    field: Field,
    rows: &[(String, u64)],
) -> PieTrace {
    PieTrace {
        name,
        labels: rows.iter().map(|(v, _)| v.clone()).collect(),
        values: rows.iter().map(|(_, c)| *c as f64).collect(),
        marker: Marker {
            color: None,
            colors: Some(
                rows.iter()
                    .map(|(v, _)| meta.color(field, v).map(|s| s.to_string()))
                    .collect(),
            ),
        },
        textinfo: "percent".to_string(),
        hoverinfo: "label+value".to_string(),
        textfont: Font::arial(PIE_TEXT_SIZE),
        insidetextfont: Font {
            family: FONT_FAMILY.to_string(),
            size: None,
            color: None,
        },
        outsidetextfont: Font {
            family: FONT_FAMILY.to_string(),
            size: None,
            color: Some("black".to_string()),
        },
        sort: false,
        domain: None,
    }
}

fn pie_title(text: String) -> Title {
    let mut t = Title::new(text, TITLE_SIZE);
    t.xref = Some("paper".to_string());
    t.yref = Some("paper".to_string());
    t
}

/// Share of each value of `field` among the registered voters of one year.
///
/// The continuous age is shown by generation.
pub fn basic_pie(table: &VoterTable, year: u16, field: Field) -> Result<Figure, ChartError> {
    info!("basic_pie: year: {} field: {}", year, field);
    let f = color_field(field);
    let meta = CategoryMetadata::resolve(&[f]);
    let label = meta.label(f)?;
    let agg = count_single(table, Some(year), f)?;
    let rows: Vec<(String, u64)> = agg
        .rows
        .iter()
        .map(|r| (r.primary.clone(), r.count))
        .collect();
    let title = format!("Registered Voters by {} in {}", label, year);
    let data = vec![Trace::Pie(pie_trace(label.to_string(), &meta, f, &rows))];
    Ok(Figure {
        data,
        layout: Layout::new(pie_title(title)),
    })
}

fn category_slices(
    table: &VoterTable,
    year: u16,
    field_a: Field,
    field_b: Field,
    category: &str,
) -> Result<Vec<(String, u64)>, ChartError> {
    let agg = count_pair(table, Some(year), field_a, field_b, false)?;
    let rows: Vec<(String, u64)> = agg
        .rows
        .iter()
        .filter(|r| r.primary == category)
        .filter_map(|r| r.secondary.clone().map(|s| (s, r.count)))
        .collect();
    if rows.is_empty() {
        debug!(
            "category_slices: no rows with {} = {:?} in {}",
            field_a, category, year
        );
    }
    Ok(rows)
}

/// Breakdown by `field_b` of the voters whose `field_a` equals `category`, for one year.
pub fn grp_pie(
    table: &VoterTable,
    year: u16,
    field_a: Field,
    field_b: Field,
    category: &str,
) -> Result<Figure, ChartError> {
    info!(
        "grp_pie: year: {} fields: {} ({}) x {}",
        year, field_a, category, field_b
    );
    let b = color_field(field_b);
    let meta = CategoryMetadata::resolve(&[field_a, b]);
    let title = format!(
        "{} ({}) <br> by {}",
        meta.label(field_a)?,
        category,
        meta.label(b)?
    );
    let rows = category_slices(table, year, field_a, b, category)?;
    let data = vec![Trace::Pie(pie_trace(year.to_string(), &meta, b, &rows))];
    Ok(Figure {
        data,
        layout: Layout::new(pie_title(title)),
    })
}

/// One `grp_pie` per election year, side by side.
pub fn multi_grp_pie(
    table: &VoterTable,
    field_a: Field,
    field_b: Field,
    category: &str,
) -> Result<Figure, ChartError> {
    info!(
        "multi_grp_pie: fields: {} ({}) x {}",
        field_a, category, field_b
    );
    let b = color_field(field_b);
    let meta = CategoryMetadata::resolve(&[field_a, b]);
    let title = format!(
        "{} ({}) by {}",
        meta.label(field_a)?,
        category,
        meta.label(b)?
    );

    let years = table.years();
    let spacing = if years.is_empty() {
        0.0
    } else {
        0.2 / (years.len() as f64)
    };
    let domains = split_domains(years.len(), spacing);

    let mut t = Title::new(title, TITLE_SIZE);
    t.yref = Some("container".to_string());
    t.y = Some(0.85);
    let mut layout = Layout::new(t);
    layout.width = Some(PIE_GRID_WIDTH);
    layout.height = Some(GRID_HEIGHT);

    let mut data: Vec<Trace> = Vec::new();
    for (year, domain) in years.iter().zip(domains.iter()) {
        let rows = category_slices(table, *year, field_a, b, category)?;
        let mut pie = pie_trace(year.to_string(), &meta, b, &rows);
        pie.domain = Some(Domain {
            x: *domain,
            y: [0.0, 1.0],
        });
        data.push(Trace::Pie(pie));
        layout.annotations.push(panel_title(
            year.to_string(),
            (domain[0] + domain[1]) / 2.0,
            0.87,
        ));
    }
    Ok(Figure { data, layout })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn repeat(n: usize, r: VoterRecord) -> Vec<VoterRecord> {
        (0..n).map(|_| r.clone()).collect()
    }

    fn rec(year: u16, vm: &str, party: &str, gender: &str, age: &str) -> VoterRecord {
        VoterRecord::new(year)
            .with(Field::VoteMethod4, vm)
            .with(Field::Party, party)
            .with(Field::Gender, gender)
            .with(Field::Age, age)
            .with(Field::Generation, if age == "70" { "Boomer" } else { "Millennial" })
    }

    fn sample_table() -> VoterTable {
        let mut records: Vec<VoterRecord> = Vec::new();
        records.extend(repeat(10, rec(2020, "Other", "Rep", "M", "70")));
        records.extend(repeat(20, rec(2020, "Election Day", "Rep", "F", "30")));
        records.extend(repeat(30, rec(2020, "No Vote", "Dem", "M", "30")));
        records.extend(repeat(40, rec(2020, "Early", "Dem", "F", "70")));
        records.extend(repeat(5, rec(2016, "Early", "Other", "U", "30")));
        records.extend(repeat(15, rec(2012, "No Vote", "Dem", "F", "70")));
        VoterTable::from_records(records)
    }

    fn bar(fig: &Figure, name: &str) -> BarTrace {
        match fig.trace(name) {
            Some(Trace::Bar(b)) => b.clone(),
            x => panic!("expected a bar trace {}, got {:?}", name, x),
        }
    }

    fn pie(fig: &Figure, idx: usize) -> PieTrace {
        match &fig.data[idx] {
            Trace::Pie(p) => p.clone(),
            x => panic!("expected a pie trace, got {:?}", x),
        }
    }

    #[test]
    fn basic_hist_counts_in_configured_order() {
        init();
        let fig = basic_hist(&sample_table(), 2020, Field::VoteMethod4).unwrap();
        assert_eq!(
            fig.trace_names(),
            vec!["Early", "No Vote", "Election Day", "Other"]
        );
        let counts: Vec<f64> = fig
            .data
            .iter()
            .map(|t| match t {
                Trace::Bar(b) => b.y[0],
                _ => panic!(),
            })
            .collect();
        assert_eq!(counts, vec![40.0, 30.0, 20.0, 10.0]);
        assert_eq!(
            fig.category_order("xaxis").unwrap(),
            &["Early", "No Vote", "Election Day", "Other"]
        );
        assert_eq!(bar(&fig, "Early").marker.color.as_deref(), Some("navy"));
        assert_eq!(
            fig.layout.title.text,
            "Distribution of Voting Method <br> in 2020 General Election"
        );
        assert!(!fig.layout.showlegend);
    }

    #[test]
    fn basic_hist_of_age_is_a_binned_histogram() {
        let fig = basic_hist(&sample_table(), 2020, Field::Age).unwrap();
        assert_eq!(fig.data.len(), 1);
        match &fig.data[0] {
            Trace::Histogram(h) => {
                assert_eq!(h.x, vec![30.0, 70.0]);
                assert_eq!(h.y, vec![50.0, 50.0]);
                assert_eq!(h.nbinsx, 50);
                assert_eq!(h.marker.color.as_deref(), Some("dodgerblue"));
            }
            x => panic!("unexpected trace {:?}", x),
        }
        assert!(fig.category_order("xaxis").is_none());
    }

    #[test]
    fn grp_hist_percent_normalizes_each_color() {
        let fig = grp_hist(
            &sample_table(),
            2020,
            Field::VoteMethod4,
            Field::Party,
            Normalization::Percent,
            BarMode::Group,
        )
        .unwrap();
        assert_eq!(fig.trace_names(), vec!["Dem", "Rep"]);
        let dem = bar(&fig, "Dem");
        assert_eq!(dem.x, vec!["Early", "No Vote"]);
        assert_eq!(dem.y, vec![57.14, 42.86]);
        assert_eq!(dem.marker.color.as_deref(), Some("blue"));
        let js = fig.to_json();
        assert_eq!(js["layout"]["yaxis"]["title"]["text"], "Percent of Registered Voters");
        assert_eq!(js["layout"]["barmode"], "group");
        assert_eq!(
            fig.layout.title.text,
            "Voting Method by Party <br> in 2020 General Election"
        );
    }

    #[test]
    fn grp_hist_redirects_age_color_to_generation() {
        let fig = grp_hist(
            &sample_table(),
            2020,
            Field::Party,
            Field::Age,
            Normalization::Count,
            BarMode::Stack,
        )
        .unwrap();
        assert_eq!(fig.trace_names(), vec!["Millennial", "Boomer"]);
        assert_eq!(
            fig.to_json()["layout"]["yaxis"]["title"]["text"],
            "Number of Registered Voters"
        );
    }

    #[test]
    fn stack_grp_hist_percent_within_primary() {
        let fig = stack_grp_hist(
            &sample_table(),
            2020,
            Field::Party,
            Field::Gender,
            Normalization::Percent,
        )
        .unwrap();
        assert_eq!(fig.trace_names(), vec!["F", "M"]);
        let f = bar(&fig, "F");
        assert_eq!(f.x, vec!["Dem", "Rep"]);
        assert_eq!(f.y, vec![57.14, 66.67]);
        let m = bar(&fig, "M");
        assert_eq!(m.y, vec![42.86, 33.33]);
        assert_eq!(fig.layout.barmode.as_deref(), Some("stack"));
        assert_eq!(
            fig.category_order("xaxis").unwrap(),
            &["Dem", "Rep", "Other"]
        );
    }

    #[test]
    fn grp_yr_hist_colors_by_year() {
        let fig = grp_yr_hist(
            &sample_table(),
            Field::Party,
            Normalization::Count,
            BarMode::Group,
        )
        .unwrap();
        assert_eq!(fig.trace_names(), vec!["2012", "2016", "2020"]);
        assert_eq!(bar(&fig, "2016").marker.color.as_deref(), Some("limegreen"));
        assert_eq!(bar(&fig, "2020").y, vec![70.0, 30.0]);
        assert_eq!(fig.layout.title.text, "Party by Election Year");
    }

    #[test]
    fn grp_yr_hist_of_age_bins_each_year() {
        init();
        let fig = grp_yr_hist(
            &sample_table(),
            Field::Age,
            Normalization::Percent,
            BarMode::Overlay,
        )
        .unwrap();
        let hists: Vec<HistogramTrace> = fig
            .data
            .iter()
            .map(|t| match t {
                Trace::Histogram(h) => h.clone(),
                x => panic!("expected a histogram trace, got {:?}", x),
            })
            .collect();
        assert_eq!(fig.trace_names(), vec!["2012", "2016", "2020"]);
        for h in hists.iter() {
            assert_eq!(h.nbinsx, 50);
            assert_eq!(h.histfunc, "sum");
            assert_eq!(h.histnorm.as_deref(), Some("percent"));
        }
        // Raw counts: the renderer normalizes inside each year.
        assert_eq!(hists[2].x, vec![30.0, 70.0]);
        assert_eq!(hists[2].y, vec![50.0, 50.0]);
        assert_eq!(hists[0].x, vec![70.0]);
        assert_eq!(hists[0].y, vec![15.0]);
        assert_eq!(hists[1].marker.color.as_deref(), Some("limegreen"));
        assert_eq!(fig.layout.barmode.as_deref(), Some("overlay"));

        let counts = grp_yr_hist(
            &sample_table(),
            Field::Age,
            Normalization::Count,
            BarMode::Overlay,
        )
        .unwrap();
        match &counts.data[0] {
            Trace::Histogram(h) => assert_eq!(h.histnorm, None),
            x => panic!("expected a histogram trace, got {:?}", x),
        }
    }

    #[test]
    fn multi_yr_hist_has_one_panel_per_year() {
        let fig = multi_yr_hist(
            &sample_table(),
            Field::VoteMethod4,
            Field::Party,
            Normalization::Count,
            BarMode::Group,
        )
        .unwrap();
        let texts: Vec<&str> = fig
            .layout
            .annotations
            .iter()
            .map(|a| a.text.as_str())
            .collect();
        assert_eq!(texts, vec!["2012", "2016", "2020"]);
        for axis in ["xaxis", "xaxis2", "xaxis3"] {
            assert_eq!(
                fig.category_order(axis).unwrap(),
                &["Early", "No Vote", "Election Day", "Other"]
            );
        }
        // Dem appears in the first and the last panel, but only once in the legend.
        let dem: Vec<&BarTrace> = fig
            .data
            .iter()
            .filter_map(|t| match t {
                Trace::Bar(b) if b.name == "Dem" => Some(b),
                _ => None,
            })
            .collect();
        assert_eq!(dem.len(), 2);
        assert!(dem[0].showlegend);
        assert!(!dem[1].showlegend);
        assert_eq!(dem[1].xaxis, "x3");
        let js = fig.to_json();
        assert_eq!(js["layout"]["yaxis2"]["matches"], "y");
        assert!(js["layout"]["xaxis2"].get("title").is_some());
        assert!(js["layout"]["xaxis"].get("title").is_none());
        assert_eq!(js["layout"]["width"], 1000);
    }

    #[test]
    fn basic_pie_redirects_age() {
        let table = sample_table();
        let from_age = basic_pie(&table, 2020, Field::Age).unwrap();
        let from_gen = basic_pie(&table, 2020, Field::Generation).unwrap();
        assert_eq!(from_age, from_gen);
        let p = pie(&from_age, 0);
        assert_eq!(p.labels, vec!["Millennial", "Boomer"]);
        assert_eq!(p.values, vec![50.0, 50.0]);
        assert_eq!(
            p.marker.colors,
            Some(vec![Some("gold".to_string()), Some("dodgerblue".to_string())])
        );
        assert_eq!(from_age.layout.title.text, "Registered Voters by Generation in 2020");
    }

    #[test]
    fn grp_pie_restricts_to_category() {
        let fig = grp_pie(&sample_table(), 2020, Field::Party, Field::Gender, "Dem").unwrap();
        let p = pie(&fig, 0);
        assert_eq!(p.labels, vec!["F", "M"]);
        assert_eq!(p.values, vec![40.0, 30.0]);
        assert_eq!(fig.layout.title.text, "Party (Dem) <br> by Gender");
    }

    #[test]
    fn grp_pie_with_unknown_category_is_empty() {
        let fig = grp_pie(&sample_table(), 2020, Field::Party, Field::Gender, "Green").unwrap();
        assert!(pie(&fig, 0).labels.is_empty());
    }

    #[test]
    fn multi_grp_pie_one_domain_per_year() {
        let fig = multi_grp_pie(&sample_table(), Field::Party, Field::Gender, "Dem").unwrap();
        assert_eq!(fig.data.len(), 3);
        let p2012 = pie(&fig, 0);
        assert_eq!(p2012.name, "2012");
        assert_eq!(p2012.labels, vec!["F"]);
        let p2016 = pie(&fig, 1);
        assert!(p2016.labels.is_empty());
        let d0 = p2012.domain.unwrap();
        let d2 = pie(&fig, 2).domain.unwrap();
        assert!(d0.x[1] < d2.x[0]);
        assert_eq!(fig.layout.width, Some(900));
        assert_eq!(fig.layout.title.text, "Party (Dem) by Gender");
    }

    #[test]
    fn unconfigured_values_render_unstyled() {
        let table = VoterTable::from_records(vec![
            VoterRecord::new(2020).with(Field::Party, "Dem"),
            VoterRecord::new(2020).with(Field::Party, "Lib"),
        ]);
        let fig = basic_hist(&table, 2020, Field::Party).unwrap();
        assert_eq!(fig.trace_names(), vec!["Dem", "Lib"]);
        assert_eq!(bar(&fig, "Lib").marker.color, None);
    }

    #[test]
    fn category_order_does_not_depend_on_row_order() {
        let table = sample_table();
        let mut reversed: Vec<VoterRecord> = table.records().to_vec();
        reversed.reverse();
        let reversed = VoterTable::from_records(reversed);
        let render = |t: &VoterTable| {
            grp_hist(
                t,
                2020,
                Field::Gender,
                Field::VoteMethod4,
                Normalization::Count,
                BarMode::Group,
            )
            .unwrap()
        };
        assert_eq!(render(&table), render(&reversed));
    }

    #[test]
    fn missing_column_propagates() {
        let table =
            VoterTable::from_records(vec![VoterRecord::new(2020).with(Field::Party, "Dem")]);
        assert_eq!(
            basic_hist(&table, 2020, Field::City),
            Err(ChartError::MissingColumn { field: Field::City })
        );
    }
}
