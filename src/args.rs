use clap::Parser;

/// This is a charting program for the turnout of registered voters in general elections.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file describing the data source and the charts to produce, in JSON.
    /// For more information about the file format, read the documentation of turnout_charts::manual
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the expected charts in JSON format. If provided, turnoutviz will
    /// check that the produced output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the charts will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the voter file to read. Setting this option overrides the
    /// data source that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv (optionally gzipped) or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Single chart description. When provided, replaces the charts of the configuration.
    /// (basic_hist, grp_hist, stack_grp_hist, grp_yr_hist, multi_yr_hist, basic_pie, grp_pie, multi_grp_pie)
    /// The kind of chart to produce.
    #[clap(long, value_parser)]
    pub chart: Option<String>,

    /// The election year, for the charts of a single year.
    #[clap(long, value_parser)]
    pub year: Option<u16>,

    /// The column to chart (for example vote_method_4).
    #[clap(long, value_parser)]
    pub field: Option<String>,

    /// The column to break the first one down by.
    #[clap(long, value_parser)]
    pub field2: Option<String>,

    /// For grouped pies, the value of --field to restrict the rows to.
    #[clap(long, value_parser)]
    pub category: Option<String>,

    /// If passed as an argument, bars show percentages instead of counts.
    #[clap(long, takes_value = false)]
    pub percent: bool,

    /// (group, stack, overlay or relative) How bars of different colors are arranged.
    #[clap(long, value_parser)]
    pub barmode: Option<String>,

    /// (default 64) The number of charts kept in memory.
    #[clap(long, value_parser)]
    pub cache_size: Option<usize>,

    /// If passed as an argument, values without a configured color are an error instead of a warning.
    #[clap(long, takes_value = false)]
    pub strict_categories: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
