//! The historical-period timeline.
//!
//! Six fixed segments from the Archaic period to the end of the Western
//! Empire. Years are signed (negative = BCE) and ranges are inclusive.
//! Ranges may overlap (the Republic runs alongside the Classical and
//! Hellenistic periods); what makes a segment distinct is its set of
//! age-tag labels, which is what the filter engine matches against.
//!
//! Period ids form a closed enum, so looking up a segment by [`PeriodId`]
//! cannot fail. Unknown ids can only arrive as strings from outside the
//! engine, where [`PeriodId::from_str`] reports
//! [`PeriodError::InvalidPeriod`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PeriodError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum PeriodId {
    Archaic,
    Classical,
    Hellenistic,
    Republican,
    EarlyEmpire,
    LateEmpire,
}

impl PeriodId {
    pub const ALL: [PeriodId; 6] = [
        PeriodId::Archaic,
        PeriodId::Classical,
        PeriodId::Hellenistic,
        PeriodId::Republican,
        PeriodId::EarlyEmpire,
        PeriodId::LateEmpire,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodId::Archaic => "archaic",
            PeriodId::Classical => "classical",
            PeriodId::Hellenistic => "hellenistic",
            PeriodId::Republican => "republican",
            PeriodId::EarlyEmpire => "early_empire",
            PeriodId::LateEmpire => "late_empire",
        }
    }

    fn index(self) -> usize {
        match self {
            PeriodId::Archaic => 0,
            PeriodId::Classical => 1,
            PeriodId::Hellenistic => 2,
            PeriodId::Republican => 3,
            PeriodId::EarlyEmpire => 4,
            PeriodId::LateEmpire => 5,
        }
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodId {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PeriodId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| PeriodError::InvalidPeriod(s.to_string()))
    }
}

impl TryFrom<String> for PeriodId {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodId> for &'static str {
    fn from(id: PeriodId) -> Self {
        id.as_str()
    }
}

/// One named segment of the timeline.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSegment {
    pub id: PeriodId,
    pub label: &'static str,
    pub start: i32,
    pub end: i32,
    pub tags: &'static [&'static str],
}

impl PeriodSegment {
    pub fn contains_year(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// True if any of `age_tags` is one of this segment's labels.
    pub fn matches_any(&self, age_tags: &[String]) -> bool {
        age_tags.iter().any(|t| self.tags.contains(&t.as_str()))
    }
}

static SEGMENTS: [PeriodSegment; 6] = [
    PeriodSegment {
        id: PeriodId::Archaic,
        label: "Archaic",
        start: -800,
        end: -480,
        tags: &["Archaic", "Late Archaic", "Peisistratid"],
    },
    PeriodSegment {
        id: PeriodId::Classical,
        label: "Classical",
        start: -480,
        end: -323,
        tags: &["Classical", "Early Classical", "High Classical", "Late Classical"],
    },
    PeriodSegment {
        id: PeriodId::Hellenistic,
        label: "Hellenistic",
        start: -323,
        end: -31,
        tags: &["Hellenistic", "Early Hellenistic", "Late Hellenistic"],
    },
    PeriodSegment {
        id: PeriodId::Republican,
        label: "Republican",
        start: -509,
        end: -27,
        tags: &["Republican", "Early Republican", "Late Republican"],
    },
    PeriodSegment {
        id: PeriodId::EarlyEmpire,
        label: "Early Empire",
        start: -27,
        end: 284,
        tags: &[
            "Augustan",
            "Julio-Claudian",
            "Flavian",
            "Trajanic",
            "Hadrianic",
            "Antonine",
            "Severan",
            "Early Imperial",
        ],
    },
    PeriodSegment {
        id: PeriodId::LateEmpire,
        label: "Late Empire",
        start: 284,
        end: 476,
        tags: &["Tetrarchic", "Constantinian", "Late Imperial", "Late Antique"],
    },
];

static STANDARD: PeriodTable = PeriodTable {
    segments: &SEGMENTS,
};

/// The immutable period table.
///
/// Only [`PeriodTable::standard`] can produce one; segments are stored in
/// [`PeriodId`] order.
#[derive(Debug)]
pub struct PeriodTable {
    segments: &'static [PeriodSegment],
}

impl PeriodTable {
    pub fn standard() -> &'static PeriodTable {
        &STANDARD
    }

    pub fn segments(&self) -> &'static [PeriodSegment] {
        self.segments
    }

    pub fn get(&self, id: PeriodId) -> &'static PeriodSegment {
        &self.segments[id.index()]
    }

    /// Age-tag labels implied by a period.
    pub fn tags_of(&self, id: PeriodId) -> &'static [&'static str] {
        self.get(id).tags
    }

    /// String-keyed variant of [`tags_of`](Self::tags_of) for callers
    /// holding an unparsed id.
    pub fn tags_for(&self, id: &str) -> Result<&'static [&'static str], PeriodError> {
        Ok(self.tags_of(id.parse()?))
    }

    pub fn min_start(&self) -> i32 {
        self.segments.iter().map(|s| s.start).min().unwrap_or(0)
    }

    pub fn max_end(&self) -> i32 {
        self.segments.iter().map(|s| s.end).max().unwrap_or(0)
    }

    /// `max(end) - min(start)`, in years.
    pub fn total_span(&self) -> i32 {
        self.max_end() - self.min_start()
    }

    /// Years elapsed between the start of the timeline and `year`.
    pub fn offset_of(&self, year: i32) -> i32 {
        year - self.min_start()
    }

    /// Segments whose range covers `year`, in table order.
    pub fn segments_at(&self, year: i32) -> Vec<&'static PeriodSegment> {
        self.segments
            .iter()
            .filter(|s| s.contains_year(year))
            .collect()
    }
}
