use std::path::{Path, PathBuf};

use tracing::debug;
use umya_spreadsheet::Worksheet;

use crate::error::{Result, SimError};
use crate::model::{Intensities, Molecule, SLOTS};
use crate::scenario::Scenario;

/// First data row; row 1 belongs to the template header.
pub const FIRST_DATA_ROW: u32 = 2;

pub fn patient_output_path(out_dir: &Path, patient: i64) -> PathBuf {
    out_dir.join(format!("patient-{}.xlsx", patient))
}

/// Appends scenario rows to a sheet, one molecule per row.
pub struct ScenarioSheet<'a> {
    sheet: &'a mut Worksheet,
    next_row: u32,
}

impl<'a> ScenarioSheet<'a> {
    pub fn new(sheet: &'a mut Worksheet) -> Self {
        Self {
            sheet,
            next_row: FIRST_DATA_ROW,
        }
    }

    pub fn next_row(&self) -> u32 {
        self.next_row
    }

    pub fn append_row(&mut self, molecule: Molecule, intensities: &Intensities, score: f64) {
        let row = self.next_row;
        self.sheet
            .get_cell_mut((1u32, row))
            .set_value_string(molecule.as_str());
        for (i, v) in intensities.iter().enumerate() {
            self.sheet
                .get_cell_mut((i as u32 + 2, row))
                .set_value_number(*v);
        }
        self.sheet
            .get_cell_mut((SLOTS as u32 + 2, row))
            .set_value_number(score);
        self.next_row += 1;
    }

    pub fn append_scenario(&mut self, scenario: &Scenario) -> Result<()> {
        for molecule in Molecule::ALL {
            let intensities = scenario.record.intensities(molecule).ok_or_else(|| {
                SimError::missing_data(
                    scenario.record.id(),
                    format!("no intensity row for {}", molecule),
                )
            })?;
            self.append_row(molecule, intensities, scenario.scores.get(molecule));
        }
        Ok(())
    }
}

/// Writes all scenarios of one patient into a copy of the template's active
/// sheet and saves it at `path`. Returns the number of data rows written.
pub fn write_patient<I>(path: &Path, template: &Path, scenarios: I) -> Result<usize>
where
    I: IntoIterator<Item = Result<Scenario>>,
{
    let mut book = umya_spreadsheet::reader::xlsx::read(template)
        .map_err(|e| SimError::write(template, format!("cannot load template: {}", e)))?;

    let rows = {
        let mut sheet = ScenarioSheet::new(book.get_active_sheet_mut());
        for scenario in scenarios {
            sheet.append_scenario(&scenario?)?;
        }
        (sheet.next_row() - FIRST_DATA_ROW) as usize
    };

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(|e| SimError::write(path, e))?;
    debug!(path = %path.display(), rows, "patient workbook written");
    Ok(rows)
}
