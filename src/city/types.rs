//! Core city map types
//!
//! Tile classifications, grid points, rectangular map areas and the growable
//! road segments used by the main road step.

use std::ops::{Add, Mul};

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

/// Classification of a single map cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Grass,
    Sidewalk,
    Road,
    Concrete,
}

impl TileType {
    pub fn display_name(&self) -> &'static str {
        match self {
            TileType::Grass => "Grass",
            TileType::Sidewalk => "Sidewalk",
            TileType::Road => "Road",
            TileType::Concrete => "Concrete",
        }
    }

    pub fn all() -> &'static [TileType] {
        &[
            TileType::Grass,
            TileType::Sidewalk,
            TileType::Road,
            TileType::Concrete,
        ]
    }
}

/// The classified grid produced by a generation run.
pub type TileGrid = Tilemap<TileType>;

/// Integer grid coordinate. Signed, since split segments can start off-map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<i32> for Point {
    type Output = Point;

    fn mul(self, rhs: i32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Cardinal facing of a road segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction for an index in `0..4`, wrapping larger values.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Axis-aligned unit step. North is towards y = 0.
    pub fn vector(&self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::East => Point::new(1, 0),
            Direction::South => Point::new(0, 1),
            Direction::West => Point::new(-1, 0),
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}

/// Axis-aligned rectangle in grid coordinates, `top_left` inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapArea {
    pub top_left: Point,
    pub size: Point,
}

impl MapArea {
    pub fn new(top_left: Point, size: Point) -> Self {
        debug_assert!(size.x >= 0 && size.y >= 0, "negative area size {size:?}");
        Self { top_left, size }
    }

    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self::new(
            top_left,
            Point::new(bottom_right.x - top_left.x, bottom_right.y - top_left.y),
        )
    }

    /// Exclusive bottom-right corner.
    pub fn bottom_right(&self) -> Point {
        self.top_left + self.size
    }

    pub fn intersects(&self, point: Point) -> bool {
        let br = self.bottom_right();
        point.x >= self.top_left.x && point.x < br.x && point.y >= self.top_left.y && point.y < br.y
    }

    /// Every integer cell inside the area, row by row.
    pub fn all_positions(&self) -> impl Iterator<Item = Point> + '_ {
        let top_left = self.top_left;
        (0..self.size.y.max(0)).flat_map(move |dy| {
            (0..self.size.x.max(0)).map(move |dx| Point::new(top_left.x + dx, top_left.y + dy))
        })
    }
}

/// A growable rectangular road footprint with a facing direction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub area: MapArea,
    pub direction: Direction,
}

impl RoadSegment {
    pub fn new(area: MapArea, direction: Direction) -> Self {
        Self { area, direction }
    }

    /// Square segment of `width` cells with its top-left corner at `origin`.
    pub fn square(origin: Point, width: i32, direction: Direction) -> Self {
        Self::new(MapArea::new(origin, Point::new(width, width)), direction)
    }

    /// Extent across the axis perpendicular to growth.
    pub fn road_width(&self) -> i32 {
        if self.direction.is_vertical() {
            self.area.size.x
        } else {
            self.area.size.y
        }
    }

    /// Grow the segment `magnitude` cells along its facing.
    ///
    /// Negative-axis growth moves the origin back and widens the area; positive-axis
    /// growth only widens it.
    pub fn resize(&mut self, magnitude: i32) {
        let grow = self.direction.vector() * magnitude;
        let mut position = self.area.top_left;
        let mut size = self.area.size;

        if grow.x < 0 {
            position.x += grow.x;
            size.x -= grow.x;
        } else if grow.x > 0 {
            size.x += grow.x;
        }

        if grow.y < 0 {
            position.y += grow.y;
            size.y -= grow.y;
        } else if grow.y > 0 {
            size.y += grow.y;
        }

        self.area = MapArea::new(position, size);
    }

    /// Number of cells this segment can grow before leaving the map or touching
    /// an already placed segment.
    ///
    /// Walks the segment origin one cell at a time along its facing. A step ends
    /// the walk when the origin, offset by the road width, falls outside
    /// `[0, map_size)` or when the origin lands inside another segment's footprint.
    pub fn max_grow_length(&self, others: &[RoadSegment], map_size: Point) -> i32 {
        let step = self.direction.vector();
        let reach = self.road_width() - 1;
        let mut position = self.area.top_left;
        let mut length = 0;

        loop {
            position = position + step;

            let out_of_bounds = position.x < 0
                || position.y < 0
                || position.x + reach >= map_size.x
                || position.y + reach >= map_size.y;
            if out_of_bounds || others.iter().any(|other| other.area.intersects(position)) {
                return length;
            }

            length += 1;
        }
    }

    /// Branch two same-width square segments off this one.
    ///
    /// Two of the three directions other than this segment's own facing are picked
    /// by shuffling them with `rng`. Each child is offset from this segment's origin
    /// by one full road width in its own direction.
    pub fn split_in_two(&self, rng: &mut ChaCha8Rng) -> [RoadSegment; 2] {
        let width = self.road_width();
        let mut candidates: Vec<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|&d| d != self.direction)
            .collect();
        candidates.shuffle(rng);

        let child = |direction: Direction| {
            let origin = self.area.top_left + direction.vector() * width;
            RoadSegment::square(origin, width, direction)
        };

        [child(candidates[0]), child(candidates[1])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_map_area_positions_and_intersection() {
        let area = MapArea::new(Point::new(2, 3), Point::new(3, 2));

        let cells: Vec<Point> = area.all_positions().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Point::new(2, 3));
        assert_eq!(cells[5], Point::new(4, 4));

        assert!(area.intersects(Point::new(2, 3)));
        assert!(area.intersects(Point::new(4, 4)));
        assert!(!area.intersects(Point::new(5, 3)));
        assert!(!area.intersects(Point::new(2, 5)));
        assert_eq!(area.bottom_right(), Point::new(5, 5));
        assert_eq!(MapArea::from_corners(Point::new(2, 3), Point::new(5, 5)), area);
    }

    #[test]
    fn test_resize_positive_and_negative_axes() {
        let origin = Point::new(5, 5);

        let mut east = RoadSegment::square(origin, 2, Direction::East);
        east.resize(3);
        assert_eq!(east.area, MapArea::new(Point::new(5, 5), Point::new(5, 2)));

        let mut west = RoadSegment::square(origin, 2, Direction::West);
        west.resize(3);
        assert_eq!(west.area, MapArea::new(Point::new(2, 5), Point::new(5, 2)));

        let mut north = RoadSegment::square(origin, 2, Direction::North);
        north.resize(3);
        assert_eq!(north.area, MapArea::new(Point::new(5, 2), Point::new(2, 5)));

        let mut south = RoadSegment::square(origin, 2, Direction::South);
        south.resize(3);
        assert_eq!(south.area, MapArea::new(Point::new(5, 5), Point::new(2, 5)));

        // Width stays the cross-axis extent after growth
        assert_eq!(east.road_width(), 2);
        assert_eq!(north.road_width(), 2);
    }

    #[test]
    fn test_max_grow_length_reaches_map_edge() {
        let map_size = Point::new(10, 10);

        let east = RoadSegment::square(Point::new(5, 5), 2, Direction::East);
        assert_eq!(east.max_grow_length(&[], map_size), 3);

        let mut grown = east.clone();
        grown.resize(3);
        assert_eq!(grown.area.bottom_right(), Point::new(10, 7));

        let north = RoadSegment::square(Point::new(5, 5), 2, Direction::North);
        assert_eq!(north.max_grow_length(&[], map_size), 5);

        let west = RoadSegment::square(Point::new(0, 0), 2, Direction::West);
        assert_eq!(west.max_grow_length(&[], map_size), 0);
    }

    #[test]
    fn test_max_grow_length_stops_at_obstacles() {
        let map_size = Point::new(20, 20);
        let segment = RoadSegment::square(Point::new(0, 0), 2, Direction::East);
        let obstacle = RoadSegment::square(Point::new(6, 0), 2, Direction::South);
        let far_obstacle = RoadSegment::square(Point::new(12, 0), 2, Direction::South);

        let free = segment.max_grow_length(&[], map_size);
        let one = segment.max_grow_length(&[far_obstacle.clone()], map_size);
        let both = segment.max_grow_length(&[far_obstacle, obstacle], map_size);

        assert_eq!(free, 18);
        assert_eq!(one, 11);
        assert_eq!(both, 5);
        assert!(free >= one && one >= both);
    }

    #[test]
    fn test_split_excludes_own_direction() {
        let parent = RoadSegment::square(Point::new(10, 10), 3, Direction::East);

        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let children = parent.split_in_two(&mut rng);

            assert_ne!(children[0].direction, children[1].direction);
            for child in &children {
                assert_ne!(child.direction, Direction::East);
                assert_eq!(child.area.size, Point::new(3, 3));
                let expected = Point::new(10, 10) + child.direction.vector() * 3;
                assert_eq!(child.area.top_left, expected);
            }
        }
    }

    #[test]
    fn test_split_is_deterministic_for_a_seed() {
        let parent = RoadSegment::square(Point::new(8, 8), 4, Direction::North);

        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(parent.split_in_two(&mut a), parent.split_in_two(&mut b));
    }
}
