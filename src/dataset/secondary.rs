//! Parser for the secondary (classification) feed: an HTML page holding
//! the UN M49 overview table. The table is located by its element id,
//! which is configurable because the publisher has renamed it before;
//! header cells are matched by text so column order does not matter.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::error::CountryError;

/// One parsed row of the classification table.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClassificationRow {
    pub name: String,
    pub m49: String,
    pub iso3: String,
    pub global_code: String,
    pub global_name: String,
    pub region_code: String,
    pub region_name: String,
    pub subregion_code: String,
    pub subregion_name: String,
    pub intermediate_region_code: String,
    pub intermediate_region_name: String,
    pub ldc: String,
    pub lldc: String,
    pub sids: String,
    pub developed: String,
}

const COL_NAME: &str = "Country or Area";
const COL_M49: &str = "M49 Code";
const COL_ISO3: &str = "ISO-alpha3 Code";
const COL_GLOBAL_CODE: &str = "Global Code";
const COL_GLOBAL_NAME: &str = "Global Name";
const COL_REGION_CODE: &str = "Region Code";
const COL_REGION_NAME: &str = "Region Name";
const COL_SUB_CODE: &str = "Sub-region Code";
const COL_SUB_NAME: &str = "Sub-region Name";
const COL_INT_CODE: &str = "Intermediate Region Code";
const COL_INT_NAME: &str = "Intermediate Region Name";
const COL_LDC: &str = "Least Developed Countries (LDC)";
const COL_LLDC: &str = "Land Locked Developing Countries (LLDC)";
const COL_SIDS: &str = "Small Island Developing States (SIDS)";
const COL_DEV: &str = "Developed / Developing Countries";

/// Parse the classification table identified by `table_name` (the HTML
/// id of the table element). Fails with a Data error when the table is
/// missing or has no usable rows.
pub(crate) fn parse_secondary(
    html: &str,
    table_name: &str,
) -> Result<Vec<ClassificationRow>, CountryError> {
    let document = Html::parse_document(html);

    let table_selector = Selector::parse(&format!("table#{}", table_name)).map_err(|_| {
        CountryError::Data(format!("invalid classification table name '{}'", table_name))
    })?;
    let table = document.select(&table_selector).next().ok_or_else(|| {
        CountryError::Data(format!(
            "required table '{}' not found in classification source",
            table_name
        ))
    })?;

    let row_selector = Selector::parse("tr").expect("static selector");
    let header_selector = Selector::parse("th").expect("static selector");
    let cell_selector = Selector::parse("td").expect("static selector");

    let mut columns: Option<Columns> = None;
    let mut rows = Vec::new();

    for tr in table.select(&row_selector) {
        let headers: Vec<String> = tr.select(&header_selector).map(cell_text).collect();
        if !headers.is_empty() {
            columns = Some(Columns::from_headers(&headers)?);
            continue;
        }
        let Some(columns) = columns.as_ref() else {
            continue;
        };
        let cells: Vec<String> = tr.select(&cell_selector).map(|c| cell_text(c)).collect();
        if cells.is_empty() {
            continue;
        }
        let row = columns.row(&cells);
        if row.iso3.is_empty() {
            // A few areas (e.g. Sark) are listed without ISO codes.
            warn!("Skipping classification row without ISO-alpha3 code: '{}'", row.name);
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(CountryError::Data(format!(
            "required table '{}' is empty",
            table_name
        )));
    }
    Ok(rows)
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Column indexes resolved from the header row.
struct Columns {
    name: usize,
    iso3: usize,
    m49: Option<usize>,
    global_code: Option<usize>,
    global_name: Option<usize>,
    region_code: Option<usize>,
    region_name: Option<usize>,
    sub_code: Option<usize>,
    sub_name: Option<usize>,
    int_code: Option<usize>,
    int_name: Option<usize>,
    ldc: Option<usize>,
    lldc: Option<usize>,
    sids: Option<usize>,
    dev: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Result<Columns, CountryError> {
        let find = |title: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(title))
        };
        let require = |title: &str| {
            find(title).ok_or_else(|| {
                CountryError::Data(format!(
                    "classification table is missing the '{}' column",
                    title
                ))
            })
        };
        Ok(Columns {
            name: require(COL_NAME)?,
            iso3: require(COL_ISO3)?,
            m49: find(COL_M49),
            global_code: find(COL_GLOBAL_CODE),
            global_name: find(COL_GLOBAL_NAME),
            region_code: find(COL_REGION_CODE),
            region_name: find(COL_REGION_NAME),
            sub_code: find(COL_SUB_CODE),
            sub_name: find(COL_SUB_NAME),
            int_code: find(COL_INT_CODE),
            int_name: find(COL_INT_NAME),
            ldc: find(COL_LDC),
            lldc: find(COL_LLDC),
            sids: find(COL_SIDS),
            dev: find(COL_DEV),
        })
    }

    fn row(&self, cells: &[String]) -> ClassificationRow {
        let get = |index: usize| cells.get(index).cloned().unwrap_or_default();
        let get_opt = |index: Option<usize>| index.map(get).unwrap_or_default();
        ClassificationRow {
            name: get(self.name),
            iso3: get(self.iso3).to_uppercase(),
            m49: get_opt(self.m49),
            global_code: get_opt(self.global_code),
            global_name: get_opt(self.global_name),
            region_code: get_opt(self.region_code),
            region_name: get_opt(self.region_name),
            subregion_code: get_opt(self.sub_code),
            subregion_name: get_opt(self.sub_name),
            intermediate_region_code: get_opt(self.int_code),
            intermediate_region_name: get_opt(self.int_name),
            ldc: get_opt(self.ldc),
            lldc: get_opt(self.lldc),
            sids: get_opt(self.sids),
            developed: get_opt(self.dev),
        }
    }
}
