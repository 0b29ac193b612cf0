use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// A bookable physical area of the studio.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
// 問い合わせのスペース名は "all" と同じく大文字小文字を区別しない
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Space {
    PrincipalZone,
    BlackZone,
    Cyclorama,
    CreativeStudio,
}

impl Space {
    pub fn all() -> impl Iterator<Item = Space> {
        Space::iter()
    }
}

/// What an availability or calendar query targets. `All` is a query-only
/// selector meaning every space at once; reservations never carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceSelector {
    All,
    Single(Space),
}

impl SpaceSelector {
    pub const ALL_KEYWORD: &'static str = "all";

    pub fn includes(self, space: Space) -> bool {
        match self {
            SpaceSelector::All => true,
            SpaceSelector::Single(s) => s == space,
        }
    }

    pub fn spaces(self) -> Vec<Space> {
        match self {
            SpaceSelector::All => Space::all().collect(),
            SpaceSelector::Single(s) => vec![s],
        }
    }

    // カレンダー集計で「全スペース」を 1 つの単位として扱うための倍率
    pub fn space_count(self) -> u32 {
        match self {
            SpaceSelector::All => Space::COUNT as u32,
            SpaceSelector::Single(_) => 1,
        }
    }
}

impl From<Space> for SpaceSelector {
    fn from(value: Space) -> Self {
        SpaceSelector::Single(value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown space: {0}")]
pub struct UnknownSpace(pub String);

impl FromStr for SpaceSelector {
    type Err = UnknownSpace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::ALL_KEYWORD) {
            return Ok(SpaceSelector::All);
        }
        s.parse::<Space>()
            .map(SpaceSelector::Single)
            .map_err(|_| UnknownSpace(s.to_string()))
    }
}

impl fmt::Display for SpaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceSelector::All => f.write_str(Self::ALL_KEYWORD),
            SpaceSelector::Single(s) => s.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spaces_and_the_all_keyword() {
        assert_eq!(
            "principal-zone".parse::<SpaceSelector>(),
            Ok(SpaceSelector::Single(Space::PrincipalZone))
        );
        assert_eq!("ALL".parse::<SpaceSelector>(), Ok(SpaceSelector::All));
        assert_eq!(
            "Black-Zone".parse::<SpaceSelector>(),
            Ok(SpaceSelector::Single(Space::BlackZone))
        );
        assert_eq!(
            " CYCLORAMA ".parse::<SpaceSelector>(),
            Ok(SpaceSelector::Single(Space::Cyclorama))
        );
        assert_eq!(
            "rooftop".parse::<SpaceSelector>(),
            Err(UnknownSpace("rooftop".into()))
        );
    }

    #[test]
    fn wire_names_round_trip_through_display() {
        for space in Space::all() {
            assert_eq!(space.to_string().parse::<Space>(), Ok(space));
        }
        assert_eq!(Space::CreativeStudio.as_ref(), "creative-studio");
    }

    #[test]
    fn all_selector_covers_every_space() {
        assert_eq!(SpaceSelector::All.spaces().len(), Space::COUNT);
        assert_eq!(SpaceSelector::All.space_count(), 4);
        assert!(!SpaceSelector::Single(Space::BlackZone).includes(Space::Cyclorama));
    }
}
