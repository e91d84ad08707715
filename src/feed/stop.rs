use serde::{Deserialize, Serialize};

/// a physical stop, platform or station from stops.txt. coordinates are the
/// raw WGS84 lon,lat from the feed; the converter applies any configured
/// coordinate transform when it creates stop facilities.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Stop {
    pub id: String,
    /// rider-facing name; optional in the feed for generic nodes
    pub name: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// the station this stop belongs to, if it is a platform of one
    pub parent_station: Option<String>,
}

impl Stop {
    /// the lon,lat of this stop, falling back to the parent station's
    /// location when this stop has none of its own.
    pub fn location(&self, parent: Option<&Stop>) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => parent.and_then(|p| match (p.longitude, p.latitude) {
                (Some(lon), Some(lat)) => Some((lon, lat)),
                _ => None,
            }),
        }
    }
}
