//! Row parsing and lookup shared by the time table sources.

use cdl_core::{CdlError, CdlResult, ensure_positive};

/// A table split into scaled time stamps and value rows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tabulated {
    pub stamps: Vec<f64>,
    pub rows: Vec<Vec<f64>>,
}

impl Tabulated {
    /// Split `table` (time in the first column) and scale its time stamps.
    ///
    /// Every row needs the same number of columns, at least two. Time stamps
    /// must be finite and non-decreasing.
    pub fn parse(block: &'static str, table: &[Vec<f64>], time_scale: f64) -> CdlResult<Self> {
        let time_scale = ensure_positive(time_scale, block, "timeScale must be > 0")?;
        let width = table
            .first()
            .map(Vec::len)
            .ok_or(CdlError::config(block, "table must have at least one row"))?;
        if width < 2 {
            return Err(CdlError::config(
                block,
                "table needs a time column and at least one value column",
            ));
        }

        let mut stamps = Vec::with_capacity(table.len());
        let mut rows = Vec::with_capacity(table.len());
        for row in table {
            if row.len() != width {
                return Err(CdlError::config(block, "table rows must have equal length"));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(CdlError::config(block, "table entries must be finite"));
            }
            let t = row[0] * time_scale;
            if stamps.last().is_some_and(|&prev| t < prev) {
                return Err(CdlError::config(block, "time stamps must be non-decreasing"));
            }
            stamps.push(t);
            rows.push(row[1..].to_vec());
        }
        Ok(Self { stamps, rows })
    }

    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Index of the last row whose stamp is `<= t`.
    pub fn row_at_or_before(&self, t: f64) -> Option<usize> {
        self.stamps.partition_point(|&s| s <= t).checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scales_and_splits() {
        let t = Tabulated::parse("TimeTable", &[vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 4.0]], 3600.0)
            .unwrap();
        assert_eq!(t.stamps, [0.0, 3600.0]);
        assert_eq!(t.rows, [vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(t.columns(), 2);
    }

    #[test]
    fn parse_rejects_bad_tables() {
        let parse = |rows: &[Vec<f64>]| Tabulated::parse("TimeTable", rows, 1.0);
        assert!(parse(&[]).is_err());
        assert!(parse(&[vec![0.0]]).is_err());
        assert!(parse(&[vec![0.0, 1.0], vec![1.0]]).is_err());
        assert!(parse(&[vec![1.0, 1.0], vec![0.0, 2.0]]).is_err());
        assert!(parse(&[vec![0.0, f64::NAN]]).is_err());
        assert!(Tabulated::parse("TimeTable", &[vec![0.0, 1.0]], 0.0).is_err());
    }

    #[test]
    fn lookup_finds_last_row_at_or_before() {
        let t = Tabulated::parse(
            "TimeTable",
            &[vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]],
            1.0,
        )
        .unwrap();
        assert_eq!(t.row_at_or_before(-0.5), None);
        assert_eq!(t.row_at_or_before(0.0), Some(0));
        assert_eq!(t.row_at_or_before(1.0), Some(2));
        assert_eq!(t.row_at_or_before(2.9), Some(2));
        assert_eq!(t.row_at_or_before(10.0), Some(3));
    }
}
