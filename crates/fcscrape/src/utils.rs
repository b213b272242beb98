use std::io;

use scraper::ElementRef;

use crate::capology::types::{PositionGroup, SalaryRow};
use crate::types::Tabular;

pub(crate) fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Default)]
pub struct RowFilter {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl RowFilter {
    pub fn apply<T>(self, mut rows: Vec<T>) -> Vec<T> {
        if let Some(off) = self.offset {
            rows = rows.into_iter().skip(off).collect();
        }
        if let Some(lim) = self.limit {
            rows.truncate(lim);
        }
        rows
    }

    /// An offset of 0 skips nothing; a limit of 0 would always yield an empty list and is rejected.
    pub fn validate(self) -> Result<Self, String> {
        if self.limit.is_some_and(|l| l == 0) {
            return Err("Limit must be greater than 0".to_string());
        }
        Ok(self)
    }
}

/// Writes `rows` as delimited text with a header line.
pub fn write_table<W: io::Write, T: Tabular>(
    writer: W,
    rows: &[T],
    delimiter: u8,
) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    out.write_record(T::headers())?;
    for row in rows {
        out.write_record(row.record())?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Debug)]
pub struct SalaryStats {
    pub keepers: usize,
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
    pub other: usize,
    pub total: usize,
}

impl SalaryStats {
    pub fn from_salary_rows(rows: &[SalaryRow]) -> SalaryStats {
        let count = |group: PositionGroup| {
            rows.iter()
                .filter(|r| r.position_group() == Some(group))
                .count()
        };
        let keepers = count(PositionGroup::Keeper);
        let defenders = count(PositionGroup::Defense);
        let midfielders = count(PositionGroup::Midfield);
        let forwards = count(PositionGroup::Forward);

        SalaryStats {
            keepers,
            defenders,
            midfielders,
            forwards,
            other: rows.len() - keepers - defenders - midfielders - forwards,
            total: rows.len(),
        }
    }
}

impl std::fmt::Display for SalaryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Keepers:     {}", self.keepers)?;
        writeln!(f, "  Defenders:   {}", self.defenders)?;
        writeln!(f, "  Midfielders: {}", self.midfielders)?;
        writeln!(f, "  Forwards:    {}", self.forwards)?;
        if self.other > 0 {
            writeln!(f, "  Unassigned:  {}", self.other)?;
        }
        writeln!(f, "  Total:       {}", self.total)
    }
}
