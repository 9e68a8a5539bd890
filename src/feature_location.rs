use crate::annotation::{Direction, Interval};
use gb_io::seq::Location;

/// Collects the directed 1-based intervals of a location. A complement flips
/// the direction and the order of its parts.
pub fn collect_location_intervals(location: &Location, reverse: bool, intervals: &mut Vec<Interval>) {
    match location {
        Location::Range((from, _), (to, _)) => {
            if *from < 0 || *to <= *from {
                return;
            }
            let direction = if reverse {
                Direction::RightToLeft
            } else {
                Direction::LeftToRight
            };
            intervals.push(Interval::new(*from as usize + 1, *to as usize, direction));
        }
        Location::Complement(inner) => {
            let mut inner_intervals = Vec::new();
            collect_location_intervals(inner, !reverse, &mut inner_intervals);
            inner_intervals.reverse();
            intervals.extend(inner_intervals);
        }
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => {
            for part in parts {
                collect_location_intervals(part, reverse, intervals);
            }
        }
        Location::External(_, maybe_loc) => {
            if let Some(loc) = maybe_loc {
                collect_location_intervals(loc, reverse, intervals);
            }
        }
        Location::Between(_, _) | Location::Gap(_) => {}
    }
}

pub fn location_intervals(location: &Location) -> Vec<Interval> {
    let mut intervals = Vec::new();
    collect_location_intervals(location, false, &mut intervals);
    intervals
}

fn interval_range(interval: &Interval) -> Location {
    Location::simple_range(interval.min_index() as i64 - 1, interval.max_index() as i64)
}

pub fn intervals_to_location(intervals: &[Interval]) -> Option<Location> {
    match intervals {
        [] => None,
        [single] => Some(match single.direction() {
            Direction::LeftToRight => interval_range(single),
            Direction::RightToLeft => Location::Complement(Box::new(interval_range(single))),
        }),
        parts if parts.iter().all(|i| i.direction().is_directed_left()) => {
            let ranges = parts.iter().rev().map(interval_range).collect();
            Some(Location::Complement(Box::new(Location::Join(ranges))))
        }
        parts => Some(Location::Join(
            parts
                .iter()
                .filter_map(|i| intervals_to_location(std::slice::from_ref(i)))
                .collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complement_join_into_leftward_intervals() {
        let location = Location::Complement(Box::new(Location::Join(vec![
            Location::simple_range(9, 20),
            Location::simple_range(39, 50),
        ])));
        let intervals = location_intervals(&location);
        assert_eq!(
            intervals,
            vec![
                Interval::new(40, 50, Direction::RightToLeft),
                Interval::new(10, 20, Direction::RightToLeft),
            ]
        );
        assert_eq!(intervals_to_location(&intervals), Some(location));
    }

    #[test]
    fn single_intervals_round_trip() {
        for interval in [
            Interval::new(1, 4, Direction::LeftToRight),
            Interval::new(1, 4, Direction::RightToLeft),
        ] {
            let location = intervals_to_location(&[interval]).unwrap();
            assert_eq!(location_intervals(&location), vec![interval]);
        }
        assert_eq!(intervals_to_location(&[]), None);
    }
}
