use crate::CatalogError;
use log::debug;
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};

/// A Holocene volcanic center.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Volcano {
    #[serde(rename = "Volcano Name", default)]
    pub name: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// Reads volcanic centers from a CSV with `lat`/`lon` columns and an
/// optional `Volcano Name`.
pub fn read_volcanoes<P: AsRef<Path>>(path: P) -> Result<Vec<Volcano>, CatalogError> {
    let volcanoes = parse(File::open(path.as_ref())?)?;
    debug!("{} volcanoes from {:?}", volcanoes.len(), path.as_ref());
    Ok(volcanoes)
}

fn parse<R: Read>(rdr: R) -> Result<Vec<Volcano>, CatalogError> {
    let mut csv = csv::Reader::from_reader(rdr);
    let mut volcanoes = Vec::new();
    for row in csv.deserialize() {
        volcanoes.push(row?);
    }
    Ok(volcanoes)
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn test_parse_volcanoes() {
        let data = "\
Volcano Name,lat,lon,Last Eruption
Corbetti,7.18,38.43,Unknown
Aluto,7.77,38.78,Unknown
";
        let volcanoes = parse(data.as_bytes()).unwrap();
        assert_eq!(volcanoes.len(), 2);
        assert_eq!(volcanoes[0].name.as_deref(), Some("Corbetti"));
        assert_eq!(volcanoes[1].longitude, 38.78);
    }

    #[test]
    fn test_name_column_optional() {
        let data = "lat,lon\n7.18,38.43\n";
        let volcanoes = parse(data.as_bytes()).unwrap();
        assert_eq!(volcanoes[0].name, None);
    }
}
