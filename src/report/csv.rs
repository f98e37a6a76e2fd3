//! Per epoch CSV table.

use std::path::Path;

use crate::{analysis::EpochRow, error::Error};

/// Writes epoch rows to `path`, header included. Nothing is written
/// for an empty row set.
pub fn write_csv(rows: &[EpochRow], path: &Path) -> Result<(), Error> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut writer = ::csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
