use crate::dashboard::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    pub title: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

/// The textual description of one chart, before validation.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChartSettings {
    pub kind: String,
    pub year: Option<u16>,
    pub field: Option<String>,
    #[serde(rename = "secondField")]
    pub second_field: Option<String>,
    pub category: Option<String>,
    pub normalization: Option<String>,
    #[serde(rename = "barMode")]
    pub bar_mode: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "dataSource")]
    pub data_source: Option<DataSource>,
    #[serde(rename = "cacheSize")]
    pub cache_size: Option<usize>,
    #[serde(rename = "strictCategories")]
    pub strict_categories: Option<bool>,
    #[serde(default)]
    pub charts: Vec<ChartSettings>,
}

pub fn read_config(path: &str) -> DashResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: DashboardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

pub fn read_reference(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!(
        "read_reference: {} figures",
        js["figures"].as_array().map(|a| a.len()).unwrap_or(0)
    );
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_uses_camel_case_keys() {
        let js = r#"{
            "outputSettings": {"title": "t"},
            "dataSource": {"provider": "xlsx", "filePath": "a.xlsx", "excelWorksheetName": "Sheet2"},
            "cacheSize": 8,
            "charts": [{"kind": "multi_yr_hist", "field": "vote_bin", "secondField": "gen_grp", "barMode": "stack"}]
        }"#;
        let config: DashboardConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.cache_size, Some(8));
        assert_eq!(config.strict_categories, None);
        let ds = config.data_source.unwrap();
        assert_eq!(ds.excel_worksheet_name.as_deref(), Some("Sheet2"));
        assert_eq!(config.charts[0].second_field.as_deref(), Some("gen_grp"));
        assert_eq!(config.charts[0].bar_mode.as_deref(), Some("stack"));
        assert_eq!(config.charts[0].year, None);
    }

    #[test]
    fn charts_default_to_empty() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert!(config.charts.is_empty());
        assert_eq!(config.output_settings, None);
    }
}
