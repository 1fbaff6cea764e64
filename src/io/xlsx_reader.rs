use std::collections::BTreeMap;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use tracing::{debug, info};

use crate::error::{Result, SimError};
use crate::model::{Intensities, Molecule, PatientRecord, SLOTS, UnknownMolecule, WEIGHTS_LABEL};

/// Column of the first intensity value (after id, in_use and label).
const FIRST_VALUE_COL: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct SheetInput {
    pub patients: BTreeMap<i64, PatientRecord>,
    /// Data rows consumed, header and blank rows excluded.
    pub rows: usize,
    pub blank_rows: usize,
}

/// Reads the single-sheet dosing workbook. The file is opened read-only.
pub fn read_patients(path: &Path) -> Result<SheetInput> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| SimError::read(path, e))?;

    let names = workbook.sheet_names();
    if names.len() != 1 {
        return Err(SimError::input_format(
            0,
            format!(
                "expected exactly one sheet in {}, found {} ({})",
                path.display(),
                names.len(),
                names.join(", ")
            ),
        ));
    }

    let range = workbook
        .worksheet_range(&names[0])
        .map_err(|e| SimError::read(path, e))?;
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

    let rows = range
        .rows()
        .enumerate()
        .map(|(i, cells)| (first_row + i + 1, cells));
    let input = parse_rows(rows)?;

    info!(
        path = %path.display(),
        sheet = %names[0],
        rows = input.rows,
        patients = input.patients.len(),
        "input_sheet_read"
    );
    Ok(input)
}

/// Builds patient records from `(row_number, cells)` pairs. The first pair
/// is the header and is skipped.
pub fn parse_rows<'a, I>(rows: I) -> Result<SheetInput>
where
    I: IntoIterator<Item = (usize, &'a [Data])>,
{
    let mut input = SheetInput::default();

    for (row_no, cells) in rows.into_iter().skip(1) {
        if cells.iter().all(is_blank) {
            debug!(row = row_no, "blank row skipped");
            input.blank_rows += 1;
            continue;
        }
        ingest_row(&mut input.patients, row_no, cells)?;
        input.rows += 1;
    }

    Ok(input)
}

fn ingest_row(
    patients: &mut BTreeMap<i64, PatientRecord>,
    row_no: usize,
    cells: &[Data],
) -> Result<()> {
    let id = cells
        .first()
        .ok_or_else(|| SimError::input_format(row_no, "missing patient id"))
        .and_then(|c| cell_to_id(row_no, c))?;

    let label = match cells.get(2) {
        Some(Data::String(s)) => s.as_str(),
        Some(other) if !is_blank(other) => {
            return Err(SimError::input_format(
                row_no,
                format!("molecule label must be text, got {:?}", other),
            ));
        }
        _ => return Err(SimError::input_format(row_no, "missing molecule label")),
    };

    let values = read_intensities(row_no, cells)?;
    let record = patients.entry(id).or_insert_with(|| PatientRecord::new(id));

    if label == WEIGHTS_LABEL {
        record.set_weights(values);
    } else {
        let molecule: Molecule = label
            .parse()
            .map_err(|e: UnknownMolecule| SimError::input_format(row_no, e.to_string()))?;
        record.set_molecule(molecule, values);
    }
    Ok(())
}

fn read_intensities(row_no: usize, cells: &[Data]) -> Result<Intensities> {
    let tail = cells.get(FIRST_VALUE_COL..).unwrap_or(&[]);
    let slice = &tail[..tail.len().min(SLOTS)];

    let found = slice.iter().take_while(|c| !is_blank(c)).count();
    if found < SLOTS {
        return Err(SimError::input_format(
            row_no,
            format!("expected {} intensity values, found {}", SLOTS, found),
        ));
    }

    let mut values = [0.0f64; SLOTS];
    for (slot, cell) in slice.iter().enumerate() {
        values[slot] = cell_to_f64(cell).ok_or_else(|| {
            SimError::input_format(
                row_no,
                format!("intensity slot {} is not numeric: {:?}", slot, cell),
            )
        })?;
    }
    Ok(values)
}

fn cell_to_id(row_no: usize, cell: &Data) -> Result<i64> {
    let id = match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Data::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    };
    id.ok_or_else(|| {
        SimError::input_format(row_no, format!("patient id is not an integer: {:?}", cell))
    })
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
