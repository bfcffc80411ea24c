use crate::CatalogError;
use geo::geometry::{Coord, LineString};
use log::debug;
use std::{fs, path::Path};

/// Reads plate-boundary polylines from a GMT multisegment file.
///
/// A `>` line starts a new segment; data lines are whitespace
/// separated `lon lat` pairs. Comment (`#`) and blank lines are
/// skipped, and empty segments are dropped.
pub fn read_boundaries<P: AsRef<Path>>(path: P) -> Result<Vec<LineString<f64>>, CatalogError> {
    let text = fs::read_to_string(path.as_ref())?;

    let mut segments: Vec<LineString<f64>> = Vec::new();
    let mut current: Vec<Coord<f64>> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('>') {
            if !current.is_empty() {
                segments.push(LineString::from(std::mem::take(&mut current)));
            }
            continue;
        }

        let mut fields = line.split_whitespace();
        let coord = fields
            .next()
            .and_then(|lon| lon.parse::<f64>().ok())
            .and_then(|lon| {
                fields
                    .next()
                    .and_then(|lat| lat.parse::<f64>().ok())
                    .map(|lat| Coord { x: lon, y: lat })
            })
            .ok_or_else(|| CatalogError::Boundary {
                path: path.as_ref().to_owned(),
                line: index + 1,
            })?;
        current.push(coord);
    }
    if !current.is_empty() {
        segments.push(LineString::from(current));
    }

    debug!("{} boundary segments from {:?}", segments.len(), path.as_ref());
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::read_boundaries;
    use std::io::Write;

    fn write_temp(tag: &str, content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("boundaries-{tag}-{}.txt", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_multisegment_parse() {
        let path = write_temp(
            "multisegment",
            "# Bird (2003) plate boundaries\n\
             > AF-SO\n\
             36.5 -1.0\n\
             37.0 0.5\n\
             \n\
             > AF-AR\n\
             39.2 12.0\n\
             40.1 13.1\n\
             41.0 14.0\n",
        );
        let segments = read_boundaries(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].0.len(), 2);
        assert_eq!(segments[1].0.len(), 3);
        assert_eq!(segments[0].0[0].x, 36.5);
        assert_eq!(segments[0].0[0].y, -1.0);
    }

    #[test]
    fn test_bad_coordinate_reports_line() {
        let path = write_temp("badcoord", "> seg\n36.5 not-a-lat\n");
        let err = read_boundaries(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("line 2"));
    }
}
