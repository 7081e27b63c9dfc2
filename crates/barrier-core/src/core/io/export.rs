use super::grid::PotentialGrid;
use crate::core::models::trajectory::Trajectory;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}

#[derive(Serialize)]
struct GridRecord {
    x: f64,
    y: f64,
    energy: f64,
}

#[derive(Serialize)]
struct FrameRecord {
    frame: usize,
    step: u64,
    time_ps: f64,
    particle: usize,
    x: f64,
    y: f64,
    z: f64,
}

/// Writes the grid as `x,y,energy` rows with x varying fastest.
pub fn write_grid_csv<W: Write>(grid: &PotentialGrid, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (x, y, energy) in grid.iter() {
        csv_writer.serialize(GridRecord { x, y, energy })?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes one `frame,step,time_ps,particle,x,y,z` row per particle per frame.
pub fn write_frames_csv<W: Write>(
    trajectory: &Trajectory,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (frame_index, frame) in trajectory.iter().enumerate() {
        for (particle, p) in frame.positions.iter().enumerate() {
            csv_writer.serialize(FrameRecord {
                frame: frame_index,
                step: frame.step,
                time_ps: frame.time,
                particle,
                x: p.x,
                y: p.y,
                z: p.z,
            })?;
        }
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn create_file(path: &Path) -> Result<File, ExportError> {
    File::create(path).map_err(|e| ExportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

pub fn write_grid_to_path(grid: &PotentialGrid, path: &Path) -> Result<(), ExportError> {
    write_grid_csv(grid, create_file(path)?)
}

pub fn write_frames_to_path(trajectory: &Trajectory, path: &Path) -> Result<(), ExportError> {
    write_frames_csv(trajectory, create_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::surface::TwoBarrierSurface;
    use crate::core::io::grid::GridSpec;
    use crate::core::models::trajectory::Frame;
    use nalgebra::Point3;
    use tempfile::tempdir;

    fn two_frame_trajectory() -> Trajectory {
        let mut trajectory = Trajectory::new();
        trajectory.push(Frame {
            step: 0,
            time: 0.0,
            positions: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 0.0)],
        });
        trajectory.push(Frame {
            step: 100,
            time: 1.0,
            positions: vec![Point3::new(0.5, -0.5, 0.0), Point3::new(1.5, 2.5, 0.0)],
        });
        trajectory
    }

    #[test]
    fn write_frames_csv_emits_header_and_one_row_per_particle_per_frame() {
        let mut buffer = Vec::new();
        write_frames_csv(&two_frame_trajectory(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "frame,step,time_ps,particle,x,y,z");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "1,100,1.0,0,0.5,-0.5,0.0");
    }

    #[test]
    fn write_grid_csv_emits_every_grid_point() {
        let spec = GridSpec {
            resolution: 3,
            ..Default::default()
        };
        let grid = PotentialGrid::sample(&TwoBarrierSurface::default(), &spec).unwrap();
        let mut buffer = Vec::new();
        write_grid_csv(&grid, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("x,y,energy\n"));
        assert_eq!(text.lines().count(), 1 + 9);
    }

    #[test]
    fn path_writers_create_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frames.csv");
        write_frames_to_path(&two_frame_trajectory(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("frame,step"));
    }

    #[test]
    fn path_writers_report_unwritable_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("frames.csv");
        let result = write_frames_to_path(&two_frame_trajectory(), &path);
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
