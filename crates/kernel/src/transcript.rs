//! Plain-text record of held controls and the resulting matrix.
//!
//! A frame is recorded only when at least one control is held. The format is:
//!
//! ```text
//! Pressed W: Move model up
//! Current Transformation Matrix:
//! 1 0 0 0
//! 0 1 0 0.01
//! 0 0 1 0
//! 0 0 0 1
//! -----------------------------
//! ```
//!
//! Matrix rows are written in row-major order, so translation appears in the
//! last column.

use crate::control::Control;
use glam::Mat4;
use std::io::{self, Write};

pub const SEPARATOR: &str = "-----------------------------";

/// Writes transcript entries to any [`Write`] sink.
#[derive(Debug)]
pub struct Transcript<W: Write> {
    sink: W,
    frames_written: u64,
}

impl<W: Write> Transcript<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            frames_written: 0,
        }
    }

    /// Number of frames recorded so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Record one frame. Does nothing when `pressed` is empty.
    pub fn record(&mut self, pressed: &[Control], matrix: &Mat4) -> io::Result<()> {
        if pressed.is_empty() {
            return Ok(());
        }
        for control in pressed {
            writeln!(
                self.sink,
                "Pressed {}: {}",
                control.label(),
                control.description()
            )?;
        }
        writeln!(self.sink, "Current Transformation Matrix:")?;
        write_matrix(&mut self.sink, matrix)?;
        writeln!(self.sink, "{SEPARATOR}")?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Write `matrix` as four space-separated rows.
pub fn write_matrix<W: Write + ?Sized>(out: &mut W, matrix: &Mat4) -> io::Result<()> {
    for r in 0..4 {
        let row = matrix.row(r);
        writeln!(out, "{} {} {} {}", row.x, row.y, row.z, row.w)?;
    }
    Ok(())
}

/// [`write_matrix`] into a `String`.
pub fn format_matrix(matrix: &Mat4) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_matrix(&mut buf, matrix);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Accumulator;

    fn record_to_string(pressed: &[Control], matrix: &Mat4) -> String {
        let mut t = Transcript::new(Vec::new());
        t.record(pressed, matrix).unwrap();
        String::from_utf8(t.into_inner()).unwrap()
    }

    #[test]
    fn idle_frames_write_nothing() {
        let mut t = Transcript::new(Vec::new());
        t.record(&[], &Mat4::IDENTITY).unwrap();
        assert_eq!(t.frames_written(), 0);
        assert!(t.into_inner().is_empty());
    }

    #[test]
    fn records_every_control_uniformly() {
        for control in Control::ALL {
            let out = record_to_string(&[control], &Mat4::IDENTITY);
            assert!(
                out.starts_with(&format!("Pressed {}:", control.label())),
                "{out}"
            );
        }
    }

    #[test]
    fn matrix_is_row_major() {
        let mut acc = Accumulator::default();
        acc.apply(Control::MoveUp);
        let out = record_to_string(&[Control::MoveUp], &acc.matrix());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Pressed W: Move model up");
        assert_eq!(lines[1], "Current Transformation Matrix:");
        assert_eq!(lines[2], "1 0 0 0");
        assert_eq!(lines[3], "0 1 0 0.01");
        assert_eq!(lines[4], "0 0 1 0");
        assert_eq!(lines[5], "0 0 0 1");
        assert_eq!(lines[6], SEPARATOR);
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn one_line_per_held_control() {
        let out = record_to_string(&[Control::MoveLeft, Control::StretchZ], &Mat4::IDENTITY);
        assert_eq!(out.matches("Pressed ").count(), 2);
        assert!(out.contains("Pressed A: Move model left"));
        assert!(out.contains("Pressed R: Stretch model along z axis"));
    }

    #[test]
    fn format_matrix_identity() {
        assert_eq!(format_matrix(&Mat4::IDENTITY), "1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1\n");
    }
}
