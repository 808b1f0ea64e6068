// Primitives for reading CSV files.

use std::fs::File;
use std::io::Read;

use flate2::read::GzDecoder;

use crate::dashboard::io_common::{simplify_file_name, HeaderMap};
use crate::dashboard::*;

fn open_reader(path: &str) -> DashResult<Box<dyn Read>> {
    let f = File::open(path).context(CsvOpenSnafu { path })?;
    let p = Path::new(path);
    if p.extension().map(|e| e == "gz").unwrap_or(false) {
        debug!("open_reader: {}: gzip compressed", simplify_file_name(path));
        Ok(Box::new(GzDecoder::new(f)))
    } else {
        Ok(Box::new(f))
    }
}

pub fn read_csv_table(path: &str) -> DashResult<VoterTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(open_reader(path)?);
    let mut records = rdr.into_records();

    let header: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu { path, lineno: 1_usize })?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => return EmptyFileSnafu { path }.fail(),
    };
    let header_map = HeaderMap::new(path, &header)?;
    debug!("read_csv_table: header: {:?}", header);

    let mut res: Vec<VoterRecord> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        res.push(header_map.read_row(line.iter(), lineno)?);
    }
    Ok(VoterTable::new(res, &header_map.fields()))
}
