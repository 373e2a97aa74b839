//! GPX track parser.
//!
//! Reads `<trkpt lat=".." lon="..">` elements in document order. The optional
//! `<ele>` child supplies the altitude in meters; points without one are
//! recorded at 0 m. Other GPX content (metadata, names, timestamps) is ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{TrackParseError, TrackParser};
use crate::position::waypoint::GeoPoint;

const TRACK_POINT: &[u8] = b"trkpt";
const ELEVATION: &[u8] = b"ele";

/// Parser for GPX 1.0/1.1 track files.
#[derive(Debug, Default, Clone, Copy)]
pub struct GpxTrackParser;

impl GpxTrackParser {
    /// Create a new GPX parser.
    pub fn new() -> Self {
        Self
    }
}

/// A track point whose closing tag has not been seen yet.
struct OpenPoint {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

impl OpenPoint {
    fn finish(self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude, self.altitude)
    }
}

impl TrackParser for GpxTrackParser {
    fn parse(&self, data: &[u8]) -> Result<Vec<GeoPoint>, TrackParseError> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut points = Vec::new();
        let mut open: Option<OpenPoint> = None;
        let mut in_elevation = false;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| TrackParseError::Malformed(e.to_string()))?;

            match event {
                Event::Eof => break,
                Event::Start(e) => {
                    let name = e.local_name();
                    if name.as_ref() == TRACK_POINT {
                        open = Some(parse_coordinates(&e, points.len())?);
                    } else if name.as_ref() == ELEVATION && open.is_some() {
                        in_elevation = true;
                    }
                }
                Event::Empty(e) => {
                    if e.local_name().as_ref() == TRACK_POINT {
                        points.push(parse_coordinates(&e, points.len())?.finish());
                    }
                }
                Event::Text(t) if in_elevation => {
                    let text = t
                        .unescape()
                        .map_err(|e| TrackParseError::Malformed(e.to_string()))?;
                    if let Some(point) = open.as_mut() {
                        point.altitude = parse_number(&text, points.len(), "ele")?;
                    }
                }
                Event::End(e) => {
                    let name = e.local_name();
                    if name.as_ref() == TRACK_POINT {
                        if let Some(point) = open.take() {
                            points.push(point.finish());
                        }
                    } else if name.as_ref() == ELEVATION {
                        in_elevation = false;
                    }
                }
                _ => {}
            }
            buf.clear();
        }

        tracing::trace!(points = points.len(), "Parsed GPX track");
        Ok(points)
    }
}

/// Read and validate the `lat`/`lon` attributes of a track point.
fn parse_coordinates(element: &BytesStart<'_>, index: usize) -> Result<OpenPoint, TrackParseError> {
    let mut latitude = None;
    let mut longitude = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| TrackParseError::Malformed(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| TrackParseError::Malformed(e.to_string()))?;
        match attr.key.local_name().as_ref() {
            b"lat" => latitude = Some(parse_number(&value, index, "lat")?),
            b"lon" => longitude = Some(parse_number(&value, index, "lon")?),
            _ => {}
        }
    }

    let latitude = latitude.ok_or(TrackParseError::MissingAttribute {
        index,
        attribute: "lat",
    })?;
    let longitude = longitude.ok_or(TrackParseError::MissingAttribute {
        index,
        attribute: "lon",
    })?;

    check_range(latitude, index, "lat", 90.0)?;
    check_range(longitude, index, "lon", 180.0)?;

    Ok(OpenPoint {
        latitude,
        longitude,
        altitude: 0.0,
    })
}

fn parse_number(text: &str, index: usize, field: &'static str) -> Result<f64, TrackParseError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TrackParseError::InvalidNumber {
            index,
            field,
            value: text.to_string(),
        })
}

fn check_range(
    value: f64,
    index: usize,
    field: &'static str,
    limit: f64,
) -> Result<(), TrackParseError> {
    if (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(TrackParseError::OutOfRange {
            index,
            field,
            value,
            min: -limit,
            max: limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpx(points: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata><name>fixture</name></metadata>
  <trk><name>fixture</name><trkseg>{}</trkseg></trk>
</gpx>"#,
            points
        )
    }

    #[test]
    fn test_parses_points_in_order() {
        let doc = gpx(r#"
            <trkpt lat="42.0" lon="-71.0"><ele>10.0</ele></trkpt>
            <trkpt lat="42.5" lon="-71.5"><ele>12.5</ele><time>2016-01-01T00:00:00Z</time></trkpt>
        "#);

        let points = GpxTrackParser::new().parse(doc.as_bytes()).unwrap();

        assert_eq!(
            points,
            vec![
                GeoPoint::new(42.0, -71.0, 10.0),
                GeoPoint::new(42.5, -71.5, 12.5),
            ]
        );
    }

    #[test]
    fn test_missing_elevation_defaults_to_zero() {
        let doc = gpx(r#"<trkpt lat="1.5" lon="2.5"></trkpt><trkpt lat="3" lon="4"/>"#);

        let points = GpxTrackParser::new().parse(doc.as_bytes()).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].altitude, 0.0);
        assert_eq!(points[1], GeoPoint::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn test_waypoints_outside_track_are_ignored() {
        let doc = r#"<gpx><wpt lat="5" lon="5"><ele>99</ele></wpt>
            <trk><trkseg><trkpt lat="1" lon="1"><ele>1</ele></trkpt></trkseg></trk></gpx>"#;

        let points = GpxTrackParser::new().parse(doc.as_bytes()).unwrap();

        assert_eq!(points, vec![GeoPoint::new(1.0, 1.0, 1.0)]);
    }

    #[test]
    fn test_prefixed_elements() {
        let doc = r#"<g:gpx xmlns:g="http://www.topografix.com/GPX/1/1"><g:trk><g:trkseg>
            <g:trkpt lat="-33.9" lon="151.2"><g:ele>4</g:ele></g:trkpt>
            </g:trkseg></g:trk></g:gpx>"#;

        let points = GpxTrackParser::new().parse(doc.as_bytes()).unwrap();

        assert_eq!(points, vec![GeoPoint::new(-33.9, 151.2, 4.0)]);
    }

    #[test]
    fn test_empty_track_yields_no_points() {
        let points = GpxTrackParser::new().parse(gpx("").as_bytes()).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_missing_longitude() {
        let doc = gpx(r#"<trkpt lat="1.0"><ele>1</ele></trkpt>"#);

        let result = GpxTrackParser::new().parse(doc.as_bytes());

        assert!(matches!(
            result,
            Err(TrackParseError::MissingAttribute {
                index: 0,
                attribute: "lon"
            })
        ));
    }

    #[test]
    fn test_invalid_number() {
        let doc = gpx(r#"
            <trkpt lat="1" lon="1"/>
            <trkpt lat="north" lon="1"/>
        "#);

        let result = GpxTrackParser::new().parse(doc.as_bytes());

        match result {
            Err(TrackParseError::InvalidNumber { index, field, value }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "lat");
                assert_eq!(value, "north");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_elevation() {
        let doc = gpx(r#"<trkpt lat="1" lon="1"><ele>high</ele></trkpt>"#);

        let result = GpxTrackParser::new().parse(doc.as_bytes());

        assert!(matches!(
            result,
            Err(TrackParseError::InvalidNumber { field: "ele", .. })
        ));
    }

    #[test]
    fn test_latitude_out_of_range() {
        let doc = gpx(r#"<trkpt lat="91.0" lon="0"/>"#);

        let result = GpxTrackParser::new().parse(doc.as_bytes());

        assert!(matches!(
            result,
            Err(TrackParseError::OutOfRange { field: "lat", .. })
        ));
    }

    #[test]
    fn test_malformed_document() {
        let doc = r#"<gpx><trk><trkseg><trkpt lat="1" lon="1"></trkseg></gpx>"#;

        let result = GpxTrackParser::new().parse(doc.as_bytes());

        assert!(matches!(result, Err(TrackParseError::Malformed(_))));
    }
}
