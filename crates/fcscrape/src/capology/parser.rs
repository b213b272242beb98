use scraper::{Html, Selector};

use super::types::{SalaryLayout, SalaryRow, Season};
use crate::utils::{elem_text, normalize_whitespace};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required element: {0}")]
    MissingElement(String),
    #[error("Unexpected salary table layout with {0} column(s)")]
    UnexpectedLayout(usize),
}

pub fn parse_seasons(html: &str) -> Result<Vec<Season>, ParseError> {
    let document = Html::parse_document(html);
    let select_sel = Selector::parse("select#nav-submenu2").unwrap();
    let option_sel = Selector::parse("option[value]").unwrap();

    let dropdown = document
        .select(&select_sel)
        .next()
        .ok_or_else(|| ParseError::MissingElement("season dropdown".to_string()))?;

    Ok(dropdown
        .select(&option_sel)
        .filter_map(|option| {
            let url = option.value().attr("value")?.to_string();
            let label = normalize_whitespace(&elem_text(option));
            Some(Season { label, url })
        })
        .collect())
}

pub fn parse_salary_table(
    html: &str,
) -> Result<(Option<SalaryLayout>, Vec<SalaryRow>), ParseError> {
    let document = Html::parse_document(html);
    let tbody_sel = Selector::parse("table#table tbody").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();

    let tbody = document
        .select(&tbody_sel)
        .next()
        .ok_or_else(|| ParseError::MissingElement("salary table".to_string()))?;

    let raw_rows: Vec<Vec<String>> = tbody
        .select(&row_sel)
        .map(|tr| {
            tr.select(&cell_sel)
                .map(|td| normalize_whitespace(&elem_text(td)))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let Some(width) = raw_rows.first().map(Vec::len) else {
        return Ok((None, Vec::new()));
    };
    let layout = SalaryLayout::from_column_count(width).ok_or(ParseError::UnexpectedLayout(width))?;
    let dropped = layout.dropped_columns();

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (i, cells) in raw_rows.into_iter().enumerate() {
        if cells.len() != width {
            log::warn!(
                "Skipping salary row {}: expected {} cells, found {}",
                i + 1,
                width,
                cells.len()
            );
            continue;
        }

        let mut row = SalaryRow::default();
        let kept = cells
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !dropped.contains(idx))
            .map(|(_, cell)| cell);
        for (column, value) in layout.columns().iter().zip(kept) {
            row.set_column(column, value);
        }
        rows.push(row);
    }

    Ok((Some(layout), rows))
}
