//! Decoding of uploaded workbooks into movie rows.
//!
//! Only the first sheet is read. Its first row is the header; columns are
//! located by name so their order does not matter and unknown columns (an
//! `id` column exported from elsewhere, say) are ignored.

use std::io::{Cursor, Read, Seek};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};

use crate::{error::AppError, models::NewMovie};

pub const MOVIE_NAME_HEADER: &str = "Movie_Name";
pub const DESCRIPTION_HEADER: &str = "Description";
pub const CASTING_HEADER: &str = "Casting";

#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("could not read spreadsheet: {0}")]
    Unreadable(#[from] calamine::Error),
    #[error("spreadsheet has no sheets")]
    NoSheets,
}

impl From<SpreadsheetError> for AppError {
    fn from(err: SpreadsheetError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// One data row of the first sheet. `row` is the 1-based sheet row number.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SheetRow {
    pub row: usize,
    pub movie_name: Option<String>,
    pub description: Option<String>,
    pub casting: Option<String>,
}

impl SheetRow {
    pub fn into_new_movie(self) -> Option<NewMovie> {
        NewMovie::from_parts(self.movie_name, self.description, self.casting)
    }
}

/// Reads a workbook held in memory. The format (xls, xlsx, xlsb, ods) is
/// detected from the contents, not from any file name.
pub fn read_bytes(bytes: Vec<u8>) -> Result<Vec<SheetRow>, SpreadsheetError> {
    first_sheet_rows(open_workbook_auto_from_rs(Cursor::new(bytes))?)
}

fn first_sheet_rows<RS>(mut workbook: Sheets<RS>) -> Result<Vec<SheetRow>, SpreadsheetError>
where
    RS: Read + Seek,
{
    let range = workbook.worksheet_range_at(0).ok_or(SpreadsheetError::NoSheets)??;
    Ok(rows_from_range(&range))
}

#[derive(Default)]
struct HeaderColumns {
    movie_name: Option<usize>,
    description: Option<usize>,
    casting: Option<usize>,
}

impl HeaderColumns {
    fn locate(header: &[Data]) -> Self {
        let mut columns = Self::default();
        for (idx, cell) in header.iter().enumerate() {
            let slot = match cell_text(cell).as_deref() {
                Some(MOVIE_NAME_HEADER) => &mut columns.movie_name,
                Some(DESCRIPTION_HEADER) => &mut columns.description,
                Some(CASTING_HEADER) => &mut columns.casting,
                _ => continue,
            };
            // First matching column wins on duplicate headers.
            slot.get_or_insert(idx);
        }
        columns
    }
}

fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows().enumerate();

    let Some((_, header)) = rows.next() else {
        return Vec::new();
    };
    let columns = HeaderColumns::locate(header);

    rows.filter(|(_, cells)| cells.iter().any(|cell| cell_text(cell).is_some()))
        .map(|(offset, cells)| {
            let field = |col: Option<usize>| col.and_then(|idx| cells.get(idx)).and_then(cell_text);
            SheetRow {
                row: first_row + offset + 1,
                movie_name: field(columns.movie_name),
                description: field(columns.description),
                casting: field(columns.casting),
            }
        })
        .collect()
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}
