//! CSV export of box positions.
//!
//! One line per box, bottom layer first:
//!
//! ```text
//! index;x;y;z;length_dir;width_dir
//! 1;0;100;144;+X;+Y
//! ```

use crate::solution::Solution;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use u_stacking_core::Result;

/// Writes the box positions of a [`Solution`] as semicolon separated values.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter {
    header: bool,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a header line first.
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Writes `solution` to `out`.
    pub fn write<W: Write>(&self, solution: &Solution, mut out: W) -> Result<()> {
        if self.header {
            writeln!(out, "index;x;y;z;length_dir;width_dir")?;
        }
        for (i, position) in solution.positions().enumerate() {
            let origin = position.position();
            writeln!(
                out,
                "{};{};{};{};{};{}",
                i + 1,
                format_coord(origin.x),
                format_coord(origin.y),
                format_coord(origin.z),
                position.length_dir(),
                position.width_dir()
            )?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes `solution` to a new file at `path`.
    pub fn export_to_path(&self, solution: &Solution, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write(solution, BufWriter::new(file))?;
        log::debug!(
            "Exported {} boxes to {}",
            solution.count(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Returns the CSV text of `solution`.
    pub fn render(&self, solution: &Solution) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(solution, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| u_stacking_core::Error::Internal(e.to_string()))
    }
}

/// Formats with at most three decimals and no trailing zeros.
fn format_coord(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::PalletProperties;
    use crate::geometry::BoxProperties;
    use crate::solution::{BranchKey, SolutionBuilder};
    use nalgebra::Vector3;
    use u_stacking_core::geometry::HalfAxis;
    use u_stacking_core::BoxPosition;

    fn solution() -> Solution {
        let mut builder = SolutionBuilder::new(
            "Column",
            BranchKey::default(),
            &BoxProperties::new(400.0, 300.0, 200.0),
            &PalletProperties::new(1200.0, 800.0, 144.0),
        );
        builder.open_layer(144.0, 200.0, 0);
        for (x, y) in [(0.0, 100.0), (400.0, 100.0), (812.5, 0.1234)] {
            let p = BoxPosition::new(Vector3::new(x, y, 144.0), HalfAxis::XPos, HalfAxis::YPos)
                .unwrap();
            builder.add_box(p);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(144.0), "144");
        assert_eq!(format_coord(812.5), "812.5");
        assert_eq!(format_coord(0.1234), "0.123");
        assert_eq!(format_coord(-0.0001), "0");
        assert_eq!(format_coord(-12.25), "-12.25");
    }

    #[test]
    fn test_one_line_per_box() {
        let text = CsvExporter::new().render(&solution()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1;0;100;144;+X;+Y");
        assert_eq!(lines[2], "3;812.5;0.123;144;+X;+Y");
    }

    #[test]
    fn test_header() {
        let text = CsvExporter::new()
            .with_header(true)
            .render(&solution())
            .unwrap();
        assert!(text.starts_with("index;x;y;z;length_dir;width_dir\n"));
        assert_eq!(text.lines().count(), 4);
    }
}
