use rust_xlsxwriter::{Format, Workbook};

use super::ImportError;

pub const TEMPLATE_FILENAME: &str = "template-importacao.xlsx";
pub const TEMPLATE_SHEET: &str = "Pessoas";

const TEMPLATE_COLUMNS: [&str; 4] = ["nome", "documento", "empresa", "setor"];

const SAMPLE_ROWS: [[&str; 4]; 2] = [
    ["Joao Silva Santos", "12345678901", "Empresa Exemplo Ltda", "Tecnologia"],
    ["Maria Oliveira Costa", "98765432100", "Outra Empresa S.A.", "Marketing"],
];

/// Build the import template: a header row and two sample attendees.
/// Documents are written as text so leading zeros survive a round trip.
pub fn template_workbook() -> Result<Vec<u8>, ImportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(TEMPLATE_SHEET)?;

    for (col, title) in TEMPLATE_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (row, values) in SAMPLE_ROWS.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            sheet.write_string(row as u32 + 1, col as u16, *value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::import::read_sheet;

    #[test]
    fn template_reads_back_as_importable_sheet() {
        let bytes = template_workbook().unwrap();
        let sheet = read_sheet(&bytes).unwrap();
        sheet.ensure_importable().unwrap();

        assert_eq!(sheet.headers, TEMPLATE_COLUMNS);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get("nome"), Some("Joao Silva Santos"));
        assert_eq!(sheet.rows[1].get("documento"), Some("98765432100"));
        assert_eq!(sheet.rows[1].get("setor"), Some("Marketing"));
    }

    #[test]
    fn template_is_a_zip_container() {
        let bytes = template_workbook().unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
