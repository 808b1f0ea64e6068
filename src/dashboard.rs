use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use turnout_charts::*;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dashboard::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the charts"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing the charts to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "The workbook {path} has several worksheets, the worksheet name must be provided"
    ))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("The file {path} is empty"))]
    EmptyFile { path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Line {lineno} of {path} has {found} cells, the header has {expected}"))]
    TruncatedRow {
        path: String,
        lineno: usize,
        found: usize,
        expected: usize,
    },
    #[snafu(display("The file {path} has no column {column}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Malformed cell at line {lineno} of {path}"))]
    MalformedCell {
        source: ChartError,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Invalid chart #{index} in the configuration"))]
    InvalidChart { source: ChartError, index: usize },
    #[snafu(display("Error producing the chart {request}"))]
    Chart {
        source: ChartError,
        request: String,
    },
    #[snafu(display("{count} values have no configured color: {summary}"))]
    UnstyledCategories { count: usize, summary: String },
    #[snafu(display("Difference detected between the charts and the reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("The path {path} has no parent directory"))]
    MissingParentDir { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

/// Reads a voter file into a table.
///
/// `input_type` is `csv` (plain or gzipped, based on the extension) or `xlsx`.
pub fn load_table(
    path: &str,
    input_type: &str,
    worksheet_name: Option<&str>,
) -> DashResult<VoterTable> {
    info!("Attempting to read voter file {:?} as {}", path, input_type);
    let table = match input_type {
        "csv" => io_csv::read_csv_table(path)?,
        "xlsx" | "excel" => io_excel::read_excel_table(path, worksheet_name)?,
        x => whatever!("Input type not supported: {:?}", x),
    };
    info!(
        "Read {} rows from {:?}, election years: {:?}",
        table.len(),
        path,
        table.years()
    );
    Ok(table)
}

fn parse_field(name: &str) -> Result<Field, ChartError> {
    name.trim().parse::<Field>()
}

fn require_field(name: &Option<String>, what: &str, index: usize) -> DashResult<Field> {
    match name {
        Some(n) => parse_field(n).context(InvalidChartSnafu { index }),
        None => whatever!("Chart #{}: missing {}", index, what),
    }
}

fn require_year(cs: &ChartSettings, index: usize) -> DashResult<u16> {
    match cs.year {
        Some(y) => Ok(y),
        None => whatever!("Chart #{}: the chart kind {} needs a year", index, cs.kind),
    }
}

fn require_category(cs: &ChartSettings, index: usize) -> DashResult<String> {
    match &cs.category {
        Some(c) if !c.trim().is_empty() => Ok(c.trim().to_string()),
        _ => whatever!(
            "Chart #{}: the chart kind {} needs a category",
            index,
            cs.kind
        ),
    }
}

/// Turns the textual description of a chart into a request, checking it against the field menu.
pub fn validate_chart(cs: &ChartSettings, index: usize) -> DashResult<ChartRequest> {
    let normalization = match cs.normalization.as_deref().map(|s| s.trim()) {
        None | Some("") | Some("count") => Normalization::Count,
        Some("percent") => Normalization::Percent,
        Some(x) => whatever!(
            "Chart #{}: cannot use normalization {:?} (count or percent)",
            index,
            x
        ),
    };
    let bar_mode = match cs.bar_mode.as_deref().map(|s| s.trim()) {
        None | Some("") | Some("group") => BarMode::Group,
        Some("stack") => BarMode::Stack,
        Some("overlay") => BarMode::Overlay,
        Some("relative") => BarMode::Relative,
        Some(x) => whatever!(
            "Chart #{}: cannot use bar mode {:?} (group, stack, overlay or relative)",
            index,
            x
        ),
    };
    let field = require_field(&cs.field, "field", index)?;
    let second = || require_field(&cs.second_field, "secondField", index);

    let res = match cs.kind.as_str() {
        "basic_hist" | "basic_pie" | "grp_yr_hist" => {
            validate_single(field).context(InvalidChartSnafu { index })?;
            match cs.kind.as_str() {
                "basic_hist" => ChartRequest::BasicHist {
                    year: require_year(cs, index)?,
                    field,
                },
                "basic_pie" => ChartRequest::BasicPie {
                    year: require_year(cs, index)?,
                    field,
                },
                _ => ChartRequest::GrpYrHist {
                    field,
                    normalization,
                    bar_mode,
                },
            }
        }
        "grp_hist" | "stack_grp_hist" | "multi_yr_hist" => {
            let second_field = second()?;
            validate_pair(field, second_field).context(InvalidChartSnafu { index })?;
            match cs.kind.as_str() {
                "grp_hist" => ChartRequest::GrpHist {
                    year: require_year(cs, index)?,
                    field,
                    second_field,
                    normalization,
                    bar_mode,
                },
                "stack_grp_hist" => ChartRequest::StackGrpHist {
                    year: require_year(cs, index)?,
                    field,
                    second_field,
                    normalization,
                },
                _ => ChartRequest::MultiYrHist {
                    field,
                    second_field,
                    normalization,
                    bar_mode,
                },
            }
        }
        "grp_pie" | "multi_grp_pie" => {
            let second_field = second()?;
            // The pie shows one category of the field picked second in the menu.
            validate_pair(second_field, field).context(InvalidChartSnafu { index })?;
            let category = require_category(cs, index)?;
            if cs.kind == "grp_pie" {
                ChartRequest::GrpPie {
                    year: require_year(cs, index)?,
                    field,
                    second_field,
                    category,
                }
            } else {
                ChartRequest::MultiGrpPie {
                    field,
                    second_field,
                    category,
                }
            }
        }
        x => whatever!("Chart #{}: unknown chart kind {:?}", index, x),
    };
    debug!("validate_chart: #{} {:?}", index, res);
    Ok(res)
}

fn chart_from_args(args: &Args, kind: &str) -> ChartSettings {
    ChartSettings {
        kind: kind.to_string(),
        year: args.year,
        field: args.field.clone(),
        second_field: args.field2.clone(),
        category: args.category.clone(),
        normalization: if args.percent {
            Some("percent".to_string())
        } else {
            None
        },
        bar_mode: args.barmode.clone(),
    }
}

fn check_categories(
    table: &VoterTable,
    requests: &[ChartRequest],
    strict: bool,
) -> DashResult<()> {
    let fields: BTreeSet<Field> = requests.iter().flat_map(|r| r.fields()).collect();
    let fields: Vec<Field> = fields.into_iter().collect();
    let gaps = check_completeness(table, &fields);
    for g in gaps.iter() {
        warn!(
            "No color configured for {} = {:?} ({} rows), it will be drawn with the default colors",
            g.field, g.value, g.count
        );
    }
    if strict && !gaps.is_empty() {
        let summary: Vec<String> = gaps
            .iter()
            .map(|g| format!("{}={:?}", g.field, g.value))
            .collect();
        return UnstyledCategoriesSnafu {
            count: gaps.len(),
            summary: summary.join(", "),
        }
        .fail();
    }
    Ok(())
}

fn build_output_js(title: &str, figures: &[(ChartRequest, Figure)]) -> JSValue {
    let figs: Vec<JSValue> = figures
        .iter()
        .map(|(req, fig)| json!({"request": req, "figure": fig}))
        .collect();
    json!({ "title": title, "figures": figs })
}

fn resolve_path(root: &Path, p: &str) -> String {
    let pb: PathBuf = [root, Path::new(p)].iter().collect();
    pb.as_path().display().to_string()
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let (config, root): (DashboardConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {
                    path: config_path.clone(),
                })?
                .to_path_buf();
            (config, root)
        }
        None => (DashboardConfig::default(), PathBuf::from(".")),
    };
    info!("config: {:?}", config);

    // Command line options take precedence over the configuration.
    let data_source = config.data_source.clone();
    let input_path: String = match (&args.input, &data_source) {
        (Some(p), _) => p.clone(),
        (None, Some(ds)) => resolve_path(&root, &ds.file_path),
        (None, None) => {
            whatever!("No input file: use --input or provide a dataSource in the configuration")
        }
    };
    let input_type: String = args
        .input_type
        .clone()
        .or_else(|| data_source.as_ref().map(|ds| ds.provider.clone()))
        .unwrap_or_else(|| "csv".to_string());
    let worksheet_name: Option<String> = args
        .excel_worksheet_name
        .clone()
        .or_else(|| data_source.as_ref().and_then(|ds| ds.excel_worksheet_name.clone()));

    let chart_settings: Vec<ChartSettings> = match &args.chart {
        Some(kind) => vec![chart_from_args(args, kind)],
        None => config.charts.clone(),
    };
    if chart_settings.is_empty() {
        whatever!("No chart requested: use --chart or provide charts in the configuration")
    }
    let requests: Vec<ChartRequest> = chart_settings
        .iter()
        .enumerate()
        .map(|(idx, cs)| validate_chart(cs, idx))
        .collect::<DashResult<Vec<ChartRequest>>>()?;

    let table = load_table(&input_path, &input_type, worksheet_name.as_deref())?;

    let strict = args.strict_categories || config.strict_categories.unwrap_or(false);
    check_categories(&table, &requests, strict)?;

    let cache_size = args
        .cache_size
        .or(config.cache_size)
        .unwrap_or(DEFAULT_CACHE_SIZE);
    let mut cache = ChartCache::new(cache_size);
    let mut figures: Vec<(ChartRequest, Figure)> = Vec::new();
    for req in requests.iter() {
        let fig = cache.get_or_render(&table, req).context(ChartSnafu {
            request: format!("{:?}", req),
        })?;
        figures.push((req.clone(), fig));
    }
    info!(
        "Produced {} charts (cache hits: {} misses: {})",
        figures.len(),
        cache.hits(),
        cache.misses()
    );

    let title = config
        .output_settings
        .as_ref()
        .and_then(|os| os.title.clone())
        .unwrap_or_else(|| "Voter turnout".to_string());
    let output_js = build_output_js(&title, &figures);
    let pretty_js = serde_json::to_string_pretty(&output_js).context(SerializingJsonSnafu {})?;

    let out_path: Option<String> = match &args.out {
        Some(p) => Some(p.clone()),
        None => config
            .output_settings
            .as_ref()
            .and_then(|os| os.output_file.clone())
            .map(|p| resolve_path(&root, &p)),
    };
    match out_path.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js),
        Some("") => {}
        Some(p) => {
            info!("Writing the charts to {:?}", p);
            fs::write(p, &pretty_js).context(WritingOutputSnafu { path: p.to_string() })?;
        }
    }

    // The reference, if provided for comparison
    if let Some(reference_p) = &args.reference {
        let reference = read_reference(reference_p)?;
        let pretty_js_reference =
            serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
        // Both sides go through the same parser so that numbers print the same way.
        let reparsed: JSValue =
            serde_json::from_str(&pretty_js).context(ParsingJsonSnafu { path: "<output>" })?;
        let pretty_js_output =
            serde_json::to_string_pretty(&reparsed).context(SerializingJsonSnafu {})?;
        if pretty_js_reference != pretty_js_output {
            warn!("Found differences with the reference string");
            print_diff(pretty_js_reference.as_str(), pretty_js_output.as_ref(), "\n");
            return ReferenceMismatchSnafu {
                path: reference_p.clone(),
            }
            .fail();
        }
        info!("The charts match the reference {:?}", reference_p);
    }

    Ok(())
}
