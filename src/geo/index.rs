use super::city::City;
use crate::model::Coordinates;

/// Split axis of a tree level. Even depths split on latitude, odd depths on
/// longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub(crate) fn for_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Axis::Latitude
        } else {
            Axis::Longitude
        }
    }

    pub(crate) fn of(self, coordinates: &Coordinates) -> f64 {
        match self {
            Axis::Latitude => coordinates.latitude,
            Axis::Longitude => coordinates.longitude,
        }
    }

    pub(crate) fn of_city(self, city: &City) -> f64 {
        match self {
            Axis::Latitude => city.latitude,
            Axis::Longitude => city.longitude,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) city: City,
    pub(crate) left: Option<Box<Node>>,
    pub(crate) right: Option<Box<Node>>,
}

/// Balanced 2-d tree over reference cities.
///
/// Built once from the full list and never modified afterwards, so a shared
/// reference can be queried from any number of threads.
#[derive(Debug, Default)]
pub struct CityIndex {
    pub(crate) root: Option<Box<Node>>,
    len: usize,
}

impl CityIndex {
    /// Builds the tree by placing the median city of each level at the node
    /// and recursing on both halves.
    pub fn build(cities: Vec<City>) -> Self {
        let len = cities.len();
        Self {
            root: build_node(cities, 0),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; `ceil(log2(len + 1))` for a balanced build.
    pub fn depth(&self) -> usize {
        fn depth_of(node: Option<&Node>) -> usize {
            node.map_or(0, |n| {
                1 + depth_of(n.left.as_deref()).max(depth_of(n.right.as_deref()))
            })
        }
        depth_of(self.root.as_deref())
    }
}

fn build_node(mut cities: Vec<City>, depth: usize) -> Option<Box<Node>> {
    if cities.is_empty() {
        return None;
    }

    let axis = Axis::for_depth(depth);
    cities.sort_by(|a, b| axis.of_city(a).total_cmp(&axis.of_city(b)));

    let median = cities.len() / 2;
    let right = cities.split_off(median + 1);
    let city = cities.pop()?;

    Some(Box::new(Node {
        city,
        left: build_node(cities, depth + 1),
        right: build_node(right, depth + 1),
    }))
}
