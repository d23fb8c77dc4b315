//! Geodesic math for corridor and distance checks.

use crate::models::LatLng;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using the Haversine
/// formula.
///
/// This is the standard formula for great-circle distance between two points
/// on a sphere given their latitudes and longitudes.
pub fn haversine_distance(a: LatLng, b: LatLng) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

// ==== ENU (East-North-Up) Coordinate Conversion ====
// These functions convert between meters and degrees using latitude-aware scaling.

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Convert a north/south offset in meters to degrees latitude.
pub fn meters_to_lat(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lat(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert an east/west offset in meters to degrees longitude.
/// Requires the reference latitude for proper scaling.
pub fn meters_to_lon(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lon(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert degrees latitude to meters using local scaling.
pub fn lat_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lat(ref_lat_deg)
}

/// Convert degrees longitude to meters at a given latitude.
pub fn lon_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lon(ref_lat_deg)
}

/// Calculate minimum distance from a point to a polyline segment (in meters).
///
/// Projects into a local ENU frame anchored at the segment start, clamps the
/// projection onto the segment, and measures the residual.
pub fn distance_to_segment_m(point: LatLng, seg_start: LatLng, seg_end: LatLng) -> f64 {
    // Convert to local ENU (using segment start as origin)
    let ref_lat = seg_start.lat;

    // Point in local coords
    let px = lon_to_meters(point.lng - seg_start.lng, ref_lat);
    let py = lat_to_meters(point.lat - seg_start.lat, ref_lat);

    // Segment end in local coords
    let sx = lon_to_meters(seg_end.lng - seg_start.lng, ref_lat);
    let sy = lat_to_meters(seg_end.lat - seg_start.lat, ref_lat);

    let seg_len_sq = sx * sx + sy * sy;

    if seg_len_sq < 0.0001 {
        // Segment is essentially a point
        return (px * px + py * py).sqrt();
    }

    // Project point onto segment line: t = ((P-A) · (B-A)) / |B-A|²
    let t = ((px * sx + py * sy) / seg_len_sq).clamp(0.0, 1.0);

    let closest_x = t * sx;
    let closest_y = t * sy;

    let dx = px - closest_x;
    let dy = py - closest_y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0));
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn haversine_same_point() {
        let p = LatLng::new(40.7128, -74.006);
        assert!(haversine_distance(p, p) < 0.001);
    }

    #[test]
    fn distance_to_segment_perpendicular_offset() {
        let base = LatLng::new(40.0, -74.0);
        let seg_end = LatLng::new(40.0, -74.0 + meters_to_lon(1000.0, 40.0));
        // 100m north of the segment midpoint
        let point = LatLng::new(
            40.0 + meters_to_lat(100.0, 40.0),
            -74.0 + meters_to_lon(500.0, 40.0),
        );
        let dist = distance_to_segment_m(point, base, seg_end);
        assert!((dist - 100.0).abs() < 1.0, "expected ~100m, got {dist}");
    }

    #[test]
    fn distance_to_segment_clamps_to_endpoints() {
        let base = LatLng::new(40.0, -74.0);
        let seg_end = LatLng::new(40.0, -74.0 + meters_to_lon(100.0, 40.0));
        // 200m west of the segment start, beyond the start endpoint
        let point = LatLng::new(40.0, -74.0 - meters_to_lon(200.0, 40.0));
        let dist = distance_to_segment_m(point, base, seg_end);
        assert!((dist - 200.0).abs() < 2.0, "expected ~200m, got {dist}");
    }

    #[test]
    fn distance_to_degenerate_segment_is_point_distance() {
        let p = LatLng::new(40.0, -74.0);
        let offset = LatLng::new(40.0 + meters_to_lat(50.0, 40.0), -74.0);
        let dist = distance_to_segment_m(offset, p, p);
        assert!((dist - 50.0).abs() < 1.0, "expected ~50m, got {dist}");
    }
}
