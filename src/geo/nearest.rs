use super::city::City;
use super::index::{Axis, CityIndex, Node};
use crate::model::{Coordinates, EARTH_RADIUS_KM};

/// Result of a nearest-city query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub city: &'a City,
    pub distance_km: f64,
}

impl CityIndex {
    /// Finds the city closest to `target` by great-circle distance.
    ///
    /// Returns `None` only for an empty index. When two cities are equally
    /// close the first one reached wins.
    pub fn nearest(&self, target: Coordinates) -> Option<Nearest<'_>> {
        let mut best = None;
        if let Some(root) = self.root.as_deref() {
            search(root, 0, &target, &mut best);
        }
        best
    }
}

fn search<'a>(
    node: &'a Node,
    depth: usize,
    target: &Coordinates,
    best: &mut Option<Nearest<'a>>,
) {
    let distance_km = target.distance_to(&node.city.coordinates());
    if best.is_none_or(|b| distance_km < b.distance_km) {
        *best = Some(Nearest {
            city: &node.city,
            distance_km,
        });
    }

    let axis = Axis::for_depth(depth);
    let (near, far) = if axis.of(target) < axis.of_city(&node.city) {
        (node.left.as_deref(), node.right.as_deref())
    } else {
        (node.right.as_deref(), node.left.as_deref())
    };

    if let Some(near) = near {
        search(near, depth + 1, target, best);
    }
    if let Some(far) = far {
        let bound = axis_gap_km(axis, target, &node.city);
        if best.is_none_or(|b| bound < b.distance_km) {
            search(far, depth + 1, target, best);
        }
    }
}

/// Lower bound on the distance from `target` to any point on the far side of
/// the plane splitting at `split`.
///
/// On the latitude axis this is the degree gap times ~111 km. On the longitude
/// axis the degree gap is scaled by cos(latitude), in its exact cross-track
/// form, and measured the short way round when the far side wraps across the
/// antimeridian.
pub(crate) fn axis_gap_km(axis: Axis, target: &Coordinates, split: &City) -> f64 {
    match axis {
        Axis::Latitude => (target.latitude - split.latitude).abs().to_radians() * EARTH_RADIUS_KM,
        Axis::Longitude => {
            let gap = if target.longitude < split.longitude {
                (split.longitude - target.longitude).min(target.longitude + 180.0)
            } else {
                (target.longitude - split.longitude).min(180.0 - target.longitude)
            };
            // Past a quarter turn the closest far-side point is a pole.
            let gap = gap.clamp(0.0, 90.0).to_radians();
            let cross_track = target.latitude.to_radians().cos() * gap.sin();
            EARTH_RADIUS_KM * cross_track.clamp(0.0, 1.0).asin()
        }
    }
}
