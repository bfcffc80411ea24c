use crate::CatalogError;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// One earthquake catalog row.
///
/// Depth is kilometers below datum, positive down, as catalogs report
/// it; [`Event::depth_m`] gives the signed plotting convention.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub magnitude: f64,
}

impl Event {
    /// Fractional days since the Unix epoch.
    ///
    /// The numeric date encoding used to colormap events by
    /// acquisition time.
    pub fn day_number(&self) -> f64 {
        self.time.timestamp_millis() as f64 / MILLIS_PER_DAY
    }

    /// Depth as signed meters, negative below datum.
    pub fn depth_m(&self) -> f64 {
        -self.depth_km * 1000.0
    }
}

/// (min, max) day numbers over `events`, `None` when empty.
pub fn day_span(events: &[Event]) -> Option<(f64, f64)> {
    let first = events.first()?.day_number();
    Some(events.iter().fold((first, first), |(min, max), event| {
        let day = event.day_number();
        (min.min(day), max.max(day))
    }))
}

/// Reads a USGS-format catalog: comma separated with RFC 3339 `time`
/// plus `latitude`, `longitude`, `depth` (km), and `mag` columns.
/// Extra columns are ignored.
pub fn read_usgs_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Event>, CatalogError> {
    let events = parse_usgs(File::open(path.as_ref())?)?;
    debug!("{} events from {:?}", events.len(), path.as_ref());
    Ok(events)
}

/// Reads a local network catalog: tab separated with the acquisition
/// time split over `YearMonthDay` and `HrMinSec` columns.
pub fn read_local_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Event>, CatalogError> {
    let events = parse_local(File::open(path.as_ref())?)?;
    debug!("{} events from {:?}", events.len(), path.as_ref());
    Ok(events)
}

#[derive(Debug, Deserialize)]
struct UsgsRow {
    time: String,
    latitude: f64,
    longitude: f64,
    depth: f64,
    mag: f64,
}

fn parse_usgs<R: Read>(rdr: R) -> Result<Vec<Event>, CatalogError> {
    let mut csv = csv::Reader::from_reader(rdr);
    let mut events = Vec::new();
    for (record, row) in csv.deserialize().enumerate() {
        let row: UsgsRow = row?;
        let time = DateTime::parse_from_rfc3339(&row.time)
            .map_err(|_| CatalogError::Timestamp {
                value: row.time.clone(),
                record,
            })?
            .with_timezone(&Utc);
        events.push(Event {
            time,
            latitude: row.latitude,
            longitude: row.longitude,
            depth_km: row.depth,
            magnitude: row.mag,
        });
    }
    Ok(events)
}

#[derive(Debug, Deserialize)]
struct LocalRow {
    #[serde(rename = "YearMonthDay")]
    date: String,
    #[serde(rename = "HrMinSec")]
    time: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Depth")]
    depth_km: f64,
    #[serde(rename = "Magnitude")]
    magnitude: f64,
}

fn parse_local<R: Read>(rdr: R) -> Result<Vec<Event>, CatalogError> {
    let mut csv = csv::ReaderBuilder::new().delimiter(b'\t').from_reader(rdr);
    let mut events = Vec::new();
    for (record, row) in csv.deserialize().enumerate() {
        let row: LocalRow = row?;
        let merged = format!("{} {}", row.date, row.time);
        let time = NaiveDateTime::parse_from_str(&merged, "%Y%m%d %H:%M:%S")
            .map_err(|_| CatalogError::Timestamp {
                value: merged.clone(),
                record,
            })?
            .and_utc();
        events.push(Event {
            time,
            latitude: row.latitude,
            longitude: row.longitude,
            depth_km: row.depth_km,
            magnitude: row.magnitude,
        });
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::{day_span, parse_local, parse_usgs};
    use approx::assert_relative_eq;

    const USGS: &str = "\
time,latitude,longitude,depth,mag,magType,place
2021-04-05T10:05:31.000Z,7.21,38.37,6.4,4.1,mb,Ethiopia
1990-01-02T00:00:00.000Z,6.95,38.51,11.0,3.2,mb,Ethiopia
";

    const LOCAL: &str = "\
YearMonthDay\tHrMinSec\tLatitude\tLongitude\tDepth\tMagnitude
20210405\t10:05:31\t7.21\t38.37\t6.4\t4.1
20210406\t23:59:59\t7.19\t38.41\t12.8\t1.7
";

    #[test]
    fn test_parse_usgs() {
        let events = parse_usgs(USGS.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_relative_eq!(events[0].latitude, 7.21);
        assert_relative_eq!(events[0].longitude, 38.37);
        assert_relative_eq!(events[0].depth_km, 6.4);
        assert_relative_eq!(events[0].magnitude, 4.1);
    }

    #[test]
    fn test_parse_local_merges_date_and_time() {
        let events = parse_local(LOCAL.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].time.to_rfc3339(),
            "2021-04-05T10:05:31+00:00"
        );
        assert_relative_eq!(events[1].depth_km, 12.8);
    }

    #[test]
    fn test_formats_agree() {
        // The same event through both readers lands on one shape.
        let usgs = parse_usgs(USGS.as_bytes()).unwrap();
        let local = parse_local(LOCAL.as_bytes()).unwrap();
        assert_eq!(usgs[0], local[0]);
    }

    #[test]
    fn test_day_number_monotonic() {
        let events = parse_usgs(USGS.as_bytes()).unwrap();
        // Second row is decades earlier.
        assert!(events[0].day_number() > events[1].day_number());
    }

    #[test]
    fn test_depth_sign_flip() {
        let events = parse_usgs(USGS.as_bytes()).unwrap();
        assert_relative_eq!(events[0].depth_m(), -6400.0);
    }

    #[test]
    fn test_day_span() {
        let events = parse_usgs(USGS.as_bytes()).unwrap();
        let (min, max) = day_span(&events).unwrap();
        assert_relative_eq!(min, events[1].day_number());
        assert_relative_eq!(max, events[0].day_number());
        assert!(day_span(&[]).is_none());
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let bad = "time,latitude,longitude,depth,mag\nyesterday,7.0,38.0,5.0,2.0\n";
        assert!(parse_usgs(bad.as_bytes()).is_err());
    }
}
