use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const QUALIFIER_SEQUENCE: &str = "sequence";
pub const QUALIFIER_RECOGNITION_PATTERN: &str = "Recognition pattern";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    RestrictionSite,
    Overhang,
    ConcatenatedSequence,
    Other(String),
}

impl AnnotationKind {
    pub fn feature_key(&self) -> &str {
        match self {
            Self::RestrictionSite => "restriction_site",
            Self::Overhang => "overhang",
            Self::ConcatenatedSequence => "concatenated_sequence",
            Self::Other(key) => key,
        }
    }

    pub fn from_feature_key(key: &str) -> Self {
        match key {
            "restriction_site" => Self::RestrictionSite,
            "overhang" => Self::Overhang,
            "concatenated_sequence" => Self::ConcatenatedSequence,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn is_directed_right(&self) -> bool {
        *self == Self::LeftToRight
    }

    pub fn is_directed_left(&self) -> bool {
        *self == Self::RightToLeft
    }
}

/// 1-based inclusive interval. `from` is where reading starts, so for
/// right-to-left intervals `from >= to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    from: usize,
    to: usize,
    direction: Direction,
}

impl Interval {
    pub fn new(a: usize, b: usize, direction: Direction) -> Self {
        let (min, max) = (a.min(b), a.max(b));
        match direction {
            Direction::LeftToRight => Self {
                from: min,
                to: max,
                direction,
            },
            Direction::RightToLeft => Self {
                from: max,
                to: min,
                direction,
            },
        }
    }

    #[inline(always)]
    pub fn from(&self) -> usize {
        self.from
    }

    #[inline(always)]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline(always)]
    pub fn min_index(&self) -> usize {
        self.from.min(self.to)
    }

    #[inline(always)]
    pub fn max_index(&self) -> usize {
        self.from.max(self.to)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.max_index() - self.min_index() + 1
    }

    pub fn with_span(&self, min: usize, max: usize) -> Self {
        Self::new(min, max, self.direction)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub name: String,
    pub intervals: Vec<Interval>,
    pub qualifiers: BTreeMap<String, String>,
}

impl Annotation {
    pub fn new(name: &str, kind: AnnotationKind) -> Self {
        Self {
            kind,
            name: name.to_string(),
            intervals: vec![],
            qualifiers: BTreeMap::new(),
        }
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }

    pub fn with_qualifier(mut self, key: &str, value: &str) -> Self {
        self.set_qualifier(key, value);
        self
    }

    pub fn set_qualifier(&mut self, key: &str, value: &str) {
        self.qualifiers.insert(key.to_string(), value.to_string());
    }

    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers.get(key).map(|s| s.as_str())
    }

    pub fn is_kind(&self, kind: &AnnotationKind) -> bool {
        self.kind == *kind
    }

    pub fn interval(&self) -> Option<&Interval> {
        self.intervals.first()
    }
}
