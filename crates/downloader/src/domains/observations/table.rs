//! HTML table extraction.
//!
//! Observation pages lay their data out in a fixed-id `<table>`; the leading
//! rows hold (possibly multi-level) column headings and the rest are one row
//! per time slice. Cell text is kept verbatim: no trimming, no numeric
//! conversion, and row lengths are not checked against any header.

use scraper::{Html, Selector};

use crate::AmedasError;

/// Markers the portal prints instead of (or next to) a value when the
/// observation is missing, doubtful or the instrument was stopped.
pub const MISSING_VALUE_MARKERS: [&str; 5] = [")", "]", "///", "×", "#"];

pub type Grid = Vec<Vec<String>>;

fn selector(css: &str) -> Result<Selector, AmedasError> {
    Selector::parse(css).map_err(|e| AmedasError::Selector(format!("'{}': {}", css, e)))
}

/// Pulls the `table_index`-th element with id `table_id` out of `html`, drops
/// its first `header_rows` rows and returns the text of every `td`/`th` cell
/// of the remaining rows in document order.
pub fn extract_table(
    html: &str,
    table_id: &str,
    header_rows: usize,
    table_index: usize,
) -> Result<Grid, AmedasError> {
    let document = Html::parse_document(html);
    let any_element = selector("*")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td, th")?;

    let table = document
        .select(&any_element)
        .filter(|el| el.value().id() == Some(table_id))
        .nth(table_index)
        .ok_or_else(|| AmedasError::TableNotFound {
            table_id: table_id.to_string(),
            index: table_index,
        })?;

    let grid = table
        .select(&row_selector)
        .skip(header_rows)
        .map(|row| {
            row.select(&cell_selector)
                .map(|cell| cell.text().collect::<String>())
                .collect()
        })
        .collect();
    Ok(grid)
}

/// True when a cell carries one of the portal's "no data" markers.
pub fn is_missing_value(cell: &str) -> bool {
    MISSING_VALUE_MARKERS
        .iter()
        .any(|marker| cell.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <table id="tablefix1" class="data2_s">
          <tr class="mtx"><th rowspan="2">時分</th><th colspan="2">気圧(hPa)</th></tr>
          <tr class="mtx"><th>現地</th><th>海面</th></tr>
          <tr class="mtx"><td>00:10</td><td>1012.3</td><td> 1015.0 </td></tr>
          <tr class="mtx"><td>00:20</td><td>1012.1)</td><td>///</td></tr>
          <tr class="mtx"><td>00:30</td><td><span>10</span>12.0</td></tr>
        </table>
        <table id="tablefix1"><tr><td>second</td></tr></table>
    </body></html>"#;

    #[test]
    fn test_skips_header_rows_and_keeps_order() {
        let grid = extract_table(PAGE, "tablefix1", 2, 0).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["00:10", "1012.3", " 1015.0 "]);
        assert_eq!(grid[1], vec!["00:20", "1012.1)", "///"]);
        // short rows are passed through untouched
        assert_eq!(grid[2], vec!["00:30", "1012.0"]);
    }

    #[test]
    fn test_returns_total_minus_skipped_rows() {
        for skip in 0..=5 {
            let grid = extract_table(PAGE, "tablefix1", skip, 0).unwrap();
            assert_eq!(grid.len(), 5_usize.saturating_sub(skip));
        }
    }

    #[test]
    fn test_header_cells_are_included_when_not_skipped() {
        let grid = extract_table(PAGE, "tablefix1", 0, 0).unwrap();
        assert_eq!(grid[0], vec!["時分", "気圧(hPa)"]);
        assert_eq!(grid[1], vec!["現地", "海面"]);
    }

    #[test]
    fn test_selects_table_by_occurrence() {
        let grid = extract_table(PAGE, "tablefix1", 0, 1).unwrap();
        assert_eq!(grid, vec![vec!["second".to_string()]]);
    }

    #[test]
    fn test_missing_table_or_index() {
        assert!(matches!(
            extract_table(PAGE, "tablefix2", 0, 0),
            Err(AmedasError::TableNotFound { .. })
        ));
        assert!(matches!(
            extract_table(PAGE, "tablefix1", 0, 2),
            Err(AmedasError::TableNotFound { index: 2, .. })
        ));
        assert!(matches!(
            extract_table("", "tablefix1", 0, 0),
            Err(AmedasError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_value_markers() {
        assert!(is_missing_value("12.3)"));
        assert!(is_missing_value("5.0]"));
        assert!(is_missing_value("///"));
        assert!(is_missing_value("×"));
        assert!(is_missing_value("#"));
        assert!(!is_missing_value("12.3"));
        assert!(!is_missing_value("--"));
        assert!(!is_missing_value(""));
    }
}
