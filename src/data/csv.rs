//! Sector table import and the downloadable sample file.
//!
//! The format is a header row naming the columns `name`, `marketCap`, `price`
//! and `change` in any order, followed by one comma-separated row per sector.
//! Fields may be double-quoted, with `""` standing for a literal quote. Rows
//! that cannot be used are skipped and reported, the rest of the file still
//! imports.

use std::path::Path;

use compact_str::CompactString;

use super::Sector;
use crate::error::ImportError;

pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "marketCap", "price", "change"];

pub const SAMPLE_CSV: &str = "name,marketCap,price,change
Commercial & Professional Svc,4284.46,0,1.76
Tadawul All Share Index (TASI),11302.35,0,0.41
Transportation,5593.49,0,0.64
Consumer Durables & Apparel,4152.07,0,-0.4
Consumer Services,4191.26,0,1.54
Media and Entertainment,19626.7,0,0.16
\"Real Estate Mgmt & Dev't\",3801.76,0,0.63
MSCI Tadawul 30 Index,1468.54,0,0.19
Software & Services,6187.39,0,-0.16";

/// Why a data row was left out of the import.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Fewer fields than the header requires
    MissingFields { found: usize, needed: usize },
    EmptyName,
    BadNumber { column: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the source text
    pub line: usize,
    pub reason: SkipReason,
}

/// Rows that imported plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub sectors: Vec<Sector>,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    market_cap: usize,
    price: usize,
    change: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, ImportError> {
        let fields = split_fields(header);
        let find = |col: &str| fields.iter().position(|f| f == col);

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| find(*col).is_none())
            .collect();

        match (find("name"), find("marketCap"), find("price"), find("change")) {
            (Some(name), Some(market_cap), Some(price), Some(change)) => Ok(Self {
                name,
                market_cap,
                price,
                change,
            }),
            _ => Err(ImportError::MissingColumns(missing)),
        }
    }

    fn needed(&self) -> usize {
        self.name.max(self.market_cap).max(self.price).max(self.change) + 1
    }
}

/// Parse a sector table, dropping unusable rows.
pub fn parse_csv(content: &str) -> Result<Vec<Sector>, ImportError> {
    parse_csv_report(content).map(|report| report.sectors)
}

/// Parse a sector table and report which lines were skipped and why.
pub fn parse_csv_report(content: &str) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();

    // A terminated header line counts as a header, even with nothing after it
    let lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.len() < 2 {
        return Ok(report);
    }

    let columns = Columns::from_header(lines[0])?;

    for (idx, &line) in lines[1..].iter().enumerate() {
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }

        match parse_row(line, &columns) {
            Ok(sector) => report.sectors.push(sector),
            Err(reason) => {
                tracing::warn!("Skipping CSV line {}: {:?} ({})", line_no, reason, line);
                report.skipped.push(SkippedLine {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    tracing::debug!(
        "Imported {} sectors, skipped {} lines",
        report.sectors.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Read and parse a sector table from disk.
pub fn read_csv_file(path: &Path) -> Result<ImportReport, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv_report(&content)
}

pub fn write_sample_csv(path: &Path) -> std::io::Result<()> {
    std::fs::write(path, SAMPLE_CSV)
}

fn parse_row(line: &str, columns: &Columns) -> Result<Sector, SkipReason> {
    let fields = split_fields(line);
    let needed = columns.needed();
    if fields.len() < needed {
        return Err(SkipReason::MissingFields {
            found: fields.len(),
            needed,
        });
    }

    let name = fields[columns.name].as_str();
    if name.is_empty() {
        return Err(SkipReason::EmptyName);
    }

    Ok(Sector {
        name: CompactString::new(name),
        market_cap: parse_number(&fields[columns.market_cap], "marketCap")?,
        price: parse_number(&fields[columns.price], "price")?,
        change: parse_number(&fields[columns.change], "change")?,
    })
}

fn parse_number(value: &str, column: &'static str) -> Result<f64, SkipReason> {
    match value.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(SkipReason::BadNumber {
            column,
            value: value.to_string(),
        }),
    }
}

/// Split one line into trimmed fields, honouring double quotes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut at_start = true;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(field.trim().to_string());
                field.clear();
                at_start = true;
            }
            '"' if at_start && field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                at_start = false;
            }
            _ => {
                field.push(c);
                if !c.is_whitespace() {
                    at_start = false;
                }
            }
        }
    }

    fields.push(field.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sample_file() {
        let sectors = parse_csv(SAMPLE_CSV).unwrap();
        assert_eq!(sectors.len(), 9);
        assert_eq!(sectors[0].name, "Commercial & Professional Svc");
        assert_eq!(sectors[0].market_cap, 4284.46);
        assert_eq!(sectors[3].change, -0.4);
        assert_eq!(sectors[6].name, "Real Estate Mgmt & Dev't");
    }

    #[test]
    fn header_order_does_not_matter() {
        let csv = "change, price ,name,marketCap\n-1.2,10,Banks,500\n";
        let sectors = parse_csv(csv).unwrap();
        assert_eq!(sectors, vec![Sector::new("Banks", 500.0, 10.0, -1.2)]);
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let csv = "name,marketCap,price,change\r\n\"Pharma, Biotech\",10,1,0.5\r\n\"The \"\"Big\"\" One\",20,2,0\r\n";
        let sectors = parse_csv(csv).unwrap();
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].name, "Pharma, Biotech");
        assert_eq!(sectors[1].name, "The \"Big\" One");
        assert_eq!(sectors[1].market_cap, 20.0);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "name,marketCap,price,change
Banks,100,1,0.5
,100,1,0.5
Energy,lots,1,0.5
Short,1

Utilities,50,2,-0.1";
        let report = parse_csv_report(csv).unwrap();
        let names: Vec<&str> = report.sectors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Banks", "Utilities"]);

        assert_eq!(report.skipped.len(), 3);
        assert_eq!(report.skipped[0].line, 3);
        assert_eq!(report.skipped[0].reason, SkipReason::EmptyName);
        assert_eq!(
            report.skipped[1].reason,
            SkipReason::BadNumber {
                column: "marketCap",
                value: "lots".to_string()
            }
        );
        assert_eq!(
            report.skipped[2].reason,
            SkipReason::MissingFields { found: 2, needed: 4 }
        );
    }

    #[test]
    fn missing_header_is_an_error_not_empty_data() {
        for input in ["name,cap,price\nBanks,1,2", "name,cap,price\n", "name,cap,price\r\n"] {
            match parse_csv(input) {
                Err(ImportError::MissingColumns(cols)) => {
                    assert_eq!(cols, vec!["marketCap", "change"], "input {input:?}")
                }
                other => panic!("unexpected result for {input:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn empty_input_is_valid_empty_data() {
        assert!(parse_csv("").unwrap().is_empty());
        assert!(parse_csv("name,marketCap,price,change").unwrap().is_empty());
        assert!(parse_csv("name,marketCap,price,change\n").unwrap().is_empty());
        assert!(parse_csv("name,marketCap,price,change\r\n").unwrap().is_empty());
        assert!(parse_csv("name,marketCap,price,change\n\n  \n").unwrap().is_empty());
        // An unterminated lone line is not checked as a header
        assert!(parse_csv("whatever").unwrap().is_empty());
    }

    #[test]
    fn splits_fields_with_whitespace_and_trailing_comma() {
        assert_eq!(split_fields(" a , \"b\" ,c,"), vec!["a", "b", "c", ""]);
        assert_eq!(split_fields("\"\""), vec![""]);
        assert_eq!(split_fields("x\"y,z"), vec!["x\"y", "z"]);
    }

    #[test]
    fn sample_file_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("sectormap-sample-{}.csv", std::process::id()));
        write_sample_csv(&path).unwrap();
        let report = read_csv_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(report.sectors.len(), 9);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let err = read_csv_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }
}
