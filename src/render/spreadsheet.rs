//! Spreadsheet export of the full denormalized, converted record set.

use std::path::Path;

use super::ensure_parent;
use crate::domain::ReportError;
use crate::services::report_service::ReportRow;

const HEADERS: [&str; 9] = [
    "date",
    "amount",
    "product",
    "category",
    "client",
    "promotion",
    "discount",
    "month",
    "amount_fcfa",
];

pub fn export_report(rows: &[ReportRow], path: &Path) -> Result<(), ReportError> {
    ensure_parent(path)?;

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| ReportError::Unexpected("workbook has no default sheet".to_owned()))?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.get_cell_mut((col as u32 + 1, 1)).set_value(*header);
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 2;
        sheet
            .get_cell_mut((1, r))
            .set_value(row.sale_date.format("%Y-%m-%d").to_string());
        sheet.get_cell_mut((2, r)).set_value_number(row.amount);
        sheet.get_cell_mut((3, r)).set_value(row.product.as_str());
        sheet.get_cell_mut((4, r)).set_value(row.category.as_str());
        sheet.get_cell_mut((5, r)).set_value(row.client.as_str());
        sheet
            .get_cell_mut((6, r))
            .set_value(row.promotion.as_str());
        sheet.get_cell_mut((7, r)).set_value_number(row.discount);
        sheet.get_cell_mut((8, r)).set_value(row.month.as_str());
        sheet
            .get_cell_mut((9, r))
            .set_value_number(row.amount_fcfa);
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| ReportError::Unexpected(format!("spreadsheet export failed: {:?}", e)))?;

    Ok(())
}
