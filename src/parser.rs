//! HTML table extraction for the streaming records page.

use anyhow::{Result, anyhow, bail};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::config::TableConfig;
use crate::record::RawRow;

/// Header texts and body rows of the located table.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractedTable {
    pub headers: Vec<String>,
    /// Non-empty rows after the header, not yet filtered by cell count.
    pub rows: Vec<RawRow>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector '{css}': {e:?}"))
}

/// Builds `table.a.b.c` from the configured class tokens.
fn table_selector(config: &TableConfig) -> Result<String> {
    let mut css = String::from("table");
    for class in &config.classes {
        let class = class.trim();
        if class.is_empty() {
            continue;
        }
        css.push('.');
        css.push_str(class);
    }
    if css == "table" {
        bail!("table config must name at least one class");
    }
    Ok(css)
}

fn cell_texts(row: ElementRef<'_>, cells: &Selector) -> Vec<String> {
    row.select(cells)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

/// Finds the first table carrying every configured class and splits it into
/// header texts and cell rows.
///
/// # Errors
///
/// Returns an error if no table on the page matches.
#[tracing::instrument(skip(html, config), fields(html_length = html.len()))]
pub fn parse_table(html: &str, config: &TableConfig) -> Result<ExtractedTable> {
    let css = table_selector(config)?;
    let table_sel = selector(&css)?;
    let row_sel = selector("tr")?;
    let header_sel = selector("th")?;
    let cell_sel = selector("th, td")?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| anyhow!("no table matching '{css}' found on page"))?;

    let mut tr = table.select(&row_sel);

    let headers = tr
        .next()
        .map(|header_row| cell_texts(header_row, &header_sel))
        .unwrap_or_default();

    let rows: Vec<RawRow> = tr
        .map(|row| cell_texts(row, &cell_sel))
        .filter(|cells| !cells.is_empty())
        .collect();

    info!(total_rows = rows.len(), ?headers, "Table extracted");
    if let Some(first) = rows.first() {
        debug!(?first, first_len = first.len(), "First row");
    }

    Ok(ExtractedTable { headers, rows })
}
