// src/output.rs
use crate::mc::induction::ExerciseBoundary;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// One row per intermediate date; missing levels are written as empty cells.
pub fn write_boundary_to_csv<P: AsRef<Path>>(filename: P, boundary: &ExerciseBoundary) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "step,time,boundary")?;
    for (i, (t, level)) in boundary.times().iter().zip(boundary.levels()).enumerate() {
        match level {
            Some(s) => writeln!(file, "{},{},{}", i + 1, t, s)?,
            None => writeln!(file, "{},{},", i + 1, t)?,
        }
    }
    file.flush()
}

pub fn write_table_to_csv<P: AsRef<Path>>(
    filename: P,
    header: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "{}", header.join(","))?;
    for row in rows {
        writeln!(file, "{}", row.join(","))?;
    }
    file.flush()
}

pub fn write_summary_to_csv<P: AsRef<Path>>(filename: P, summary_data: &[(&str, String)]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    file.flush()
}
