// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::dashboard::io_common::HeaderMap;
use crate::dashboard::*;

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> DashResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyFileSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_table: path: {:?} worksheet: {:?}",
                    path, worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path }.fail(),
        }
    }
}

fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(_) => match cell.as_date() {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => {
                debug!("read_cell: date out of range: {:?}", cell);
                "".to_string()
            }
        },
        DataType::Empty => "".to_string(),
        other => {
            debug!("read_cell: treating {:?} as missing", other);
            "".to_string()
        }
    }
}

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> DashResult<VoterTable> {
    let wrange = get_range(path, worksheet_name)?;
    let mut rows = wrange.rows();
    let header: Vec<String> = match rows.next() {
        Some(r) => r.iter().map(read_cell).collect(),
        None => return EmptyFileSnafu { path }.fail(),
    };
    debug!("read_excel_table: header: {:?}", header);
    let header_map = HeaderMap::new(path, &header)?;

    let mut res: Vec<VoterRecord> = Vec::new();
    for (idx, row) in rows.enumerate() {
        let lineno = idx + 2;
        let cells: Vec<String> = row.iter().map(read_cell).collect();
        res.push(header_map.read_row(cells, lineno)?);
    }
    Ok(VoterTable::new(res, &header_map.fields()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excel_serial_dates() {
        assert_eq!(read_cell(&DataType::DateTime(25569.0)), "1970-01-01");
        assert_eq!(read_cell(&DataType::DateTime(32216.0)), "1988-03-14");
        assert_eq!(read_cell(&DataType::DateTime(44197.5)), "2021-01-01");
    }

    #[test]
    fn cells_as_text() {
        assert_eq!(read_cell(&DataType::Float(2020.0)), "2020");
        assert_eq!(read_cell(&DataType::Int(47)), "47");
        assert_eq!(read_cell(&DataType::String("Dem".to_string())), "Dem");
        assert_eq!(read_cell(&DataType::Empty), "");
    }
}
