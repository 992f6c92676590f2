//! Column layout kinds declared by source editions.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::level::Level;

const TWO_LEVELS: &[Level] = &[Level::State, Level::Municipality];
const FOUR_LEVELS: &[Level] = &[
    Level::State,
    Level::Mesoregion,
    Level::Microregion,
    Level::Municipality,
];

/// Shape of the rows an edition ships.
///
/// The layout decides which hierarchy levels exist in the edition and how a
/// raw row maps onto them. It is read from the edition table, never inferred
/// from the data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnLayout {
    /// State and municipality only, in columns 0-1 and 3-4.
    TwoLevel,
    /// State through municipality in contiguous columns 0-7.
    FourLevel,
    /// All six levels in contiguous columns 0-11.
    SixLevel,
    /// All six levels with unused columns interleaved after microregion.
    SixLevelGapped,
    /// Legacy flat file of fixed-width byte records.
    FixedWidth,
}

impl ColumnLayout {
    pub const ALL: [ColumnLayout; 5] = [
        ColumnLayout::TwoLevel,
        ColumnLayout::FourLevel,
        ColumnLayout::SixLevel,
        ColumnLayout::SixLevelGapped,
        ColumnLayout::FixedWidth,
    ];

    /// Levels present in this layout, parent first.
    pub fn levels(self) -> &'static [Level] {
        match self {
            ColumnLayout::TwoLevel => TWO_LEVELS,
            ColumnLayout::FourLevel => FOUR_LEVELS,
            ColumnLayout::SixLevel | ColumnLayout::SixLevelGapped | ColumnLayout::FixedWidth => {
                &Level::ALL
            }
        }
    }

    pub fn contains(self, level: Level) -> bool {
        self.levels().contains(&level)
    }

    /// Ancestors of `level` that this layout carries, nearest first.
    pub fn ancestors_of(self, level: Level) -> impl Iterator<Item = Level> {
        level.ancestors().filter(move |ancestor| self.contains(*ancestor))
    }

    pub fn is_tabular(self) -> bool {
        !matches!(self, ColumnLayout::FixedWidth)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnLayout::TwoLevel => "two-level",
            ColumnLayout::FourLevel => "four-level",
            ColumnLayout::SixLevel => "six-level",
            ColumnLayout::SixLevelGapped => "six-level-gapped",
            ColumnLayout::FixedWidth => "fixed-width",
        }
    }
}

impl fmt::Display for ColumnLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnLayout {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        ColumnLayout::ALL
            .into_iter()
            .find(|layout| layout.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownLayout(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_level_skips_regions() {
        let layout = ColumnLayout::TwoLevel;
        assert!(!layout.contains(Level::Mesoregion));
        let ancestors: Vec<Level> = layout.ancestors_of(Level::Municipality).collect();
        assert_eq!(ancestors, vec![Level::State]);
    }

    #[test]
    fn parses_layout_names() {
        assert_eq!(
            "six_level_gapped".parse::<ColumnLayout>(),
            Ok(ColumnLayout::SixLevelGapped)
        );
        assert_eq!(
            "nine-level".parse::<ColumnLayout>(),
            Err(ModelError::UnknownLayout("nine-level".to_string()))
        );
    }
}
