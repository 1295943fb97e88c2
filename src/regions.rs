use crate::types::{BoundingBox, LunarCrs};

/// Named lunar regions in geographic Moon 2000 coordinates (degrees)
static GCS_REGIONS: &[(&str, BoundingBox)] = &[(
    "Gruithuisen Domes",
    BoundingBox {
        left: -46.0,
        bottom: 31.0,
        right: -34.0,
        top: 43.0,
    },
)];

/// Named lunar regions in equidistant cylindrical coordinates (meters)
static EDCM_REGIONS: &[(&str, BoundingBox)] = &[(
    "Gruithuisen Domes",
    BoundingBox {
        left: -1_394_000.0,
        bottom: 939_000.0,
        right: -1_031_000.0,
        top: 1_301_000.0,
    },
)];

fn table(crs: LunarCrs) -> &'static [(&'static str, BoundingBox)] {
    match crs {
        LunarCrs::GcsMoon2000 => GCS_REGIONS,
        LunarCrs::EquidistantCylindrical => EDCM_REGIONS,
    }
}

/// Look up the bounding box of a named region in the given coordinate system.
pub fn lookup(crs: LunarCrs, name: &str) -> Option<BoundingBox> {
    table(crs)
        .iter()
        .find(|(region, _)| *region == name)
        .map(|(_, bbox)| *bbox)
}

/// Names of all regions registered for the given coordinate system.
pub fn region_names(crs: LunarCrs) -> Vec<&'static str> {
    table(crs).iter().map(|(region, _)| *region).collect()
}
