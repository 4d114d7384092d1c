// src/fetch/scrape.rs

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use super::{get_checked, Transport};
use crate::date_range::{DateRange, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::process::raw_table::{RawDataset, RawRecord};

/// Container of the hour-contracts results on a TGE day page.
pub const TABLE_SELECTOR: &str = "div.table-responsive.wyniki-table-kontrakty-godzinowe";

/// Label given to the date column prepended to the sub-header row.
pub const DATE_COLUMN: &str = "Data";

/// Format of the date stamped in front of every data row.
pub const ROW_DATE_FORMAT: &str = "%Y-%m-%d";

/// Indentation left around a cell's text after splitting.
const INDENT: &[char] = &[' ', '\r'];

static FIELD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\t]+").expect("field separator pattern should compile"));

/// The page for `day` is the base URL with the date appended.
pub fn day_endpoint(base_url: &str, day: NaiveDate) -> Result<Url> {
    Ok(Url::parse(&format!("{}{}", base_url, day.format(DATE_FORMAT)))?)
}

/// Fetch every day in `range`, oldest first, and stitch the tables together.
#[instrument(level = "info", skip(transport, base_url, range), fields(range = %range))]
pub fn scrape<T: Transport + ?Sized>(
    transport: &T,
    base_url: &str,
    range: &DateRange,
) -> Result<RawDataset> {
    info!(days = range.len_days(), "Scraping data...");
    let dataset = range
        .days()
        .try_fold(RawDataset::default(), |acc, day| {
            scrape_day(transport, base_url, day, acc)
        })?;
    info!(rows = dataset.len(), "Data scraped");
    Ok(dataset)
}

fn scrape_day<T: Transport + ?Sized>(
    transport: &T,
    base_url: &str,
    day: NaiveDate,
    acc: RawDataset,
) -> Result<RawDataset> {
    let endpoint = day_endpoint(base_url, day)?;
    let page = get_checked(transport, &endpoint)?.text();

    let fragments = parse_fragments(&page);
    if fragments.is_empty() {
        return Err(Error::Scrape {
            date: day,
            reason: format!("no `{}` table on {}", TABLE_SELECTOR, endpoint),
        });
    }
    debug!(%day, fragments = fragments.len(), "parsed page");

    fragments
        .into_iter()
        .try_fold(acc, |acc, fragment| absorb(acc, fragment, day))
}

/// Rows of every matching table container on the page, one list per container.
pub fn parse_fragments(html: &str) -> Vec<Vec<RawRecord>> {
    let doc = Html::parse_document(html);
    let table = Selector::parse(TABLE_SELECTOR).expect("table selector should parse");
    let row = Selector::parse("tr").expect("row selector should parse");

    doc.select(&table)
        .map(|fragment| {
            fragment
                .select(&row)
                .map(|tr| split_row(&tr.text().collect::<String>()))
                .filter(|record| !record.is_empty())
                .collect()
        })
        .collect()
}

/// Split a row's flattened text on runs of newlines and tabs.
///
/// Only the outer ends of the row are trimmed. Interior pieces lose their
/// indentation spaces but are always kept, so a cell holding only `&nbsp;`
/// still occupies its column. A row with no text yields no fields.
pub fn split_row(text: &str) -> RawRecord {
    let text = text.trim();
    if text.is_empty() {
        return RawRecord::new();
    }
    FIELD_SEPARATOR
        .split(text)
        .map(|field| field.trim_matches(INDENT).to_string())
        .collect()
}

/// Fold one container's rows into the accumulated dataset.
///
/// The first container seen keeps its two header rows; every later one only
/// contributes data rows. Data rows are stamped with `day` either way.
pub fn absorb(mut acc: RawDataset, fragment: Vec<RawRecord>, day: NaiveDate) -> Result<RawDataset> {
    let stamp = day.format(ROW_DATE_FORMAT).to_string();
    let stamped = |mut row: RawRecord| {
        row.insert(0, stamp.clone());
        row
    };

    if acc.is_empty() {
        if fragment.len() < 2 {
            return Err(Error::Scrape {
                date: day,
                reason: format!("expected two header rows, found {}", fragment.len()),
            });
        }
        let mut rows = fragment.into_iter();
        let labels = rows.next().unwrap_or_default();
        let mut sub_header = rows.next().unwrap_or_default();
        sub_header.insert(0, DATE_COLUMN.to_string());

        let mut records = vec![labels, sub_header];
        records.extend(rows.map(stamped));
        Ok(RawDataset::new(records))
    } else {
        acc.extend(fragment.into_iter().skip(2).map(stamped));
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(fields: &[&str]) -> RawRecord {
        fields.iter().map(|s| s.to_string()).collect()
    }

    const PAGE: &str = "<html><body>\
        <div class=\"other\"><table><tr><td>ignored</td></tr></table></div>\
        <div class=\"table-responsive wyniki-table-kontrakty-godzinowe\"><table>\n\
        <tr>\n\t<th>FIXING I</th>\n\t<th>Notowania ciągłe</th>\n</tr>\n\
        <tr>\n\t<th>Czas</th>\n\t<th>Kurs</th>\n\t<th>Wolumen</th>\n</tr>\n\
        <tr>\n\t\t<td>00-01</td>\n\t\t<td>410,00</td>\n\t\t<td>1 200,5</td>\n</tr>\n\
        <tr></tr>\n\
        </table></div></body></html>";

    #[test]
    fn split_row_handles_runs_and_padding() {
        assert_eq!(
            split_row("\n\t 00-01 \n\n\t410,00\t\t1 200,5\n"),
            rec(&["00-01", "410,00", "1 200,5"])
        );
        assert!(split_row(" \n\t ").is_empty());
    }

    #[test]
    fn split_row_keeps_whitespace_only_cells() {
        assert_eq!(
            split_row("\n\t\t00-01\n\t\t\u{a0}\n\t\t10,0\n"),
            rec(&["00-01", "\u{a0}", "10,0"])
        );
    }

    #[test]
    fn nbsp_cell_keeps_row_width() {
        let page = "<html><body><div class=\"table-responsive wyniki-table-kontrakty-godzinowe\"><table>\n\
            <tr>\n\t<th>FIXING I</th>\n</tr>\n\
            <tr>\n\t<th>Czas</th>\n\t<th>Kurs (PLN/MWh)</th>\n\t<th>Wolumen (MWh)</th>\n</tr>\n\
            <tr>\n\t\t<td>00-01</td>\n\t\t<td>&nbsp;</td>\n\t\t<td>10,0</td>\n</tr>\n\
            </table></div></body></html>";
        let fragments = parse_fragments(page);
        assert_eq!(fragments.len(), 1);
        let rows = &fragments[0];
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[2], rec(&["00-01", "\u{a0}", "10,0"]));
    }

    #[test]
    fn parses_only_marked_container() {
        let fragments = parse_fragments(PAGE);
        assert_eq!(fragments.len(), 1);
        assert_eq!(
            fragments[0],
            vec![
                rec(&["FIXING I", "Notowania ciągłe"]),
                rec(&["Czas", "Kurs", "Wolumen"]),
                rec(&["00-01", "410,00", "1 200,5"]),
            ]
        );
    }

    #[test]
    fn page_without_container_has_no_fragments() {
        assert!(parse_fragments("<html><body><table><tr><td>x</td></tr></table></body></html>").is_empty());
    }

    #[test]
    fn first_fragment_keeps_headers() {
        let fragment = vec![rec(&["G"]), rec(&["Czas", "v"]), rec(&["01-02", "1"])];
        let ds = absorb(RawDataset::default(), fragment, d(2024, 1, 1)).unwrap();
        assert_eq!(
            ds.records(),
            &[
                rec(&["G"]),
                rec(&["Data", "Czas", "v"]),
                rec(&["2024-01-01", "01-02", "1"]),
            ]
        );
    }

    #[test]
    fn later_fragments_only_add_stamped_rows() {
        let first = vec![rec(&["G"]), rec(&["Czas", "v"]), rec(&["01-02", "1"])];
        let second = vec![rec(&["G"]), rec(&["Czas", "v"]), rec(&["01-02", "2"])];
        let ds = absorb(RawDataset::default(), first, d(2024, 1, 1)).unwrap();
        let ds = absorb(ds, second, d(2024, 1, 2)).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.data_rows()[1], rec(&["2024-01-02", "01-02", "2"]));
    }

    #[test]
    fn first_fragment_without_headers_is_rejected() {
        let err = absorb(RawDataset::default(), vec![rec(&["G"])], d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::Scrape { .. }));
    }
}
