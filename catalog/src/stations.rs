use crate::CatalogError;
use log::debug;
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};

/// A seismic station deployment location.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Station {
    #[serde(rename = "Station Code")]
    pub code: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Reads station locations from a CSV with `Station Code`,
/// `Latitude`, and `Longitude` columns.
pub fn read_stations<P: AsRef<Path>>(path: P) -> Result<Vec<Station>, CatalogError> {
    let stations = parse(File::open(path.as_ref())?)?;
    debug!("{} stations from {:?}", stations.len(), path.as_ref());
    Ok(stations)
}

fn parse<R: Read>(rdr: R) -> Result<Vec<Station>, CatalogError> {
    let mut csv = csv::Reader::from_reader(rdr);
    let mut stations = Vec::new();
    for row in csv.deserialize() {
        stations.push(row?);
    }
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn test_parse_stations() {
        let data = "\
Station Code,Latitude,Longitude,Elevation
CORB,7.205,38.43,1980
HAWA,7.08,38.49,1702
";
        let stations = parse(data.as_bytes()).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].code, "CORB");
        assert_eq!(stations[1].latitude, 7.08);
    }
}
