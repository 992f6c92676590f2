//! Row normalization: raw id/name strings to absolute integer ids.
//!
//! Sources store most ids truncated, without the digits inherited from an
//! ancestor. A truncated id is recognised purely by its length and composed
//! by prefixing the already-absolute id of a fixed ancestor:
//!
//! | Level        | Truncated length | Prefix source |
//! |--------------|------------------|---------------|
//! | mesoregion   | 2                | state         |
//! | microregion  | 3                | state         |
//! | municipality | 5                | state         |
//! | district     | 2                | municipality  |
//! | subdistrict  | 2                | district      |
//!
//! Malformed rows never fail. A level that cannot be resolved is dropped,
//! together with every descendant that would otherwise point at it.

use dtb_model::{ColumnLayout, DatabaseRow, Level, LevelValue, RawRow};

/// How a level's truncated id is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdComposition {
    pub truncated_len: usize,
    pub prefix: Level,
}

/// Composition rule of a level; the state id is always absolute.
pub const fn id_composition(level: Level) -> Option<IdComposition> {
    match level {
        Level::State => None,
        Level::Mesoregion => Some(IdComposition {
            truncated_len: 2,
            prefix: Level::State,
        }),
        Level::Microregion => Some(IdComposition {
            truncated_len: 3,
            prefix: Level::State,
        }),
        Level::Municipality => Some(IdComposition {
            truncated_len: 5,
            prefix: Level::State,
        }),
        Level::District => Some(IdComposition {
            truncated_len: 2,
            prefix: Level::Municipality,
        }),
        Level::Subdistrict => Some(IdComposition {
            truncated_len: 2,
            prefix: Level::District,
        }),
    }
}

/// Stateless normalizer; the same raw row always yields the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowNormalizer;

impl RowNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: &RawRow) -> DatabaseRow {
        let composed = compose_ids(raw);
        let mut row = DatabaseRow::default();
        for level in Level::ALL {
            let Some((id, name)) = &composed[level.index()] else {
                continue;
            };
            // Zero or unparsable ids count as absent.
            let Some(id) = parse_id(id) else {
                continue;
            };
            *row.slot_mut(level) = Some(LevelValue::new(id, name.clone()));
        }
        drop_orphans(&mut row, raw.layout);
        row
    }
}

/// Resolve every present level to an absolute id string, parent first so a
/// prefix source is always complete before its descendants read it.
fn compose_ids(raw: &RawRow) -> [Option<(String, String)>; 6] {
    let mut composed: [Option<(String, String)>; 6] = Default::default();
    for level in Level::ALL {
        let pair = raw.pair(level);
        let Some(name) = non_blank(pair.name.as_deref()) else {
            continue;
        };
        let Some(id) = non_blank(pair.id.as_deref()) else {
            continue;
        };
        if !id.bytes().all(|byte| byte.is_ascii_digit()) {
            continue;
        }
        let id = match id_composition(level) {
            Some(rule) if id.len() == rule.truncated_len => {
                match &composed[rule.prefix.index()] {
                    Some((prefix, _)) => format!("{prefix}{id}"),
                    None => continue,
                }
            }
            _ => id.to_string(),
        };
        composed[level.index()] = Some((id, name.to_string()));
    }
    composed
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_id(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().filter(|id| *id != 0)
}

/// Null every level whose layout ancestors are not all present.
fn drop_orphans(row: &mut DatabaseRow, layout: ColumnLayout) {
    for level in Level::ALL {
        if !layout.contains(level) {
            *row.slot_mut(level) = None;
            continue;
        }
        if row.get(level).is_none() {
            continue;
        }
        let orphaned = layout
            .ancestors_of(level)
            .any(|ancestor| row.get(ancestor).is_none());
        if orphaned {
            *row.slot_mut(level) = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use dtb_model::RawPair;

    use super::*;

    fn six_level(pairs: [(&str, &str); 6]) -> RawRow {
        let mut row = RawRow::empty(ColumnLayout::SixLevel);
        for (level, (id, name)) in Level::ALL.into_iter().zip(pairs) {
            if !id.is_empty() || !name.is_empty() {
                row.set(level, RawPair::new(id, name));
            }
        }
        row
    }

    #[test]
    fn composes_truncated_municipality_from_state() {
        let raw = six_level([
            ("35", "São Paulo"),
            ("15", "Metropolitana de São Paulo"),
            ("061", "São Paulo"),
            ("01234", "Exemplo"),
            ("", ""),
            ("", ""),
        ]);
        let row = RowNormalizer.normalize(&raw);
        assert_eq!(row.id(Level::Mesoregion), Some(3515));
        assert_eq!(row.id(Level::Microregion), Some(35061));
        assert_eq!(row.id(Level::Municipality), Some(3501234));
        assert_eq!(row.district, None);
    }

    #[test]
    fn absolute_ids_are_kept() {
        let raw = six_level([
            ("35", "São Paulo"),
            ("3515", "Metropolitana de São Paulo"),
            ("35061", "São Paulo"),
            ("3550308", "São Paulo"),
            ("05", "Sé"),
            ("01", "Sé"),
        ]);
        let row = RowNormalizer.normalize(&raw);
        assert_eq!(row.id(Level::Mesoregion), Some(3515));
        assert_eq!(row.id(Level::District), Some(355030805));
        assert_eq!(row.id(Level::Subdistrict), Some(35503080501));
    }

    #[test]
    fn missing_name_drops_level_and_descendants() {
        let raw = six_level([
            ("35", "São Paulo"),
            ("15", ""),
            ("061", "São Paulo"),
            ("50308", "São Paulo"),
            ("", ""),
            ("", ""),
        ]);
        let row = RowNormalizer.normalize(&raw);
        assert_eq!(row.id(Level::State), Some(35));
        assert_eq!(row.mesoregion, None);
        assert_eq!(row.microregion, None);
        assert_eq!(row.municipality, None);
    }

    #[test]
    fn truncated_id_without_prefix_source_is_absent() {
        let mut raw = RawRow::empty(ColumnLayout::TwoLevel);
        raw.set(Level::Municipality, RawPair::new("01234", "Exemplo"));
        let row = RowNormalizer.normalize(&raw);
        assert!(row.is_empty());
    }

    #[test]
    fn zero_ids_are_absent() {
        let raw = six_level([
            ("35", "São Paulo"),
            ("3515", "Metropolitana"),
            ("35061", "São Paulo"),
            ("3550308", "São Paulo"),
            ("000000000", "Ignorado"),
            ("", ""),
        ]);
        let row = RowNormalizer.normalize(&raw);
        assert_eq!(row.district, None);
        assert_eq!(row.leaf(), Some(Level::Municipality));
    }

    #[test]
    fn non_numeric_ids_are_absent() {
        let raw = six_level([
            ("UF", "Nome_UF"),
            ("", ""),
            ("", ""),
            ("", ""),
            ("", ""),
            ("", ""),
        ]);
        assert!(RowNormalizer.normalize(&raw).is_empty());
    }

    #[test]
    fn two_level_rows_skip_region_ancestors() {
        let mut raw = RawRow::empty(ColumnLayout::TwoLevel);
        raw.set(Level::State, RawPair::new("35", "São Paulo"));
        raw.set(Level::Municipality, RawPair::new("00105", "Adamantina"));
        let row = RowNormalizer.normalize(&raw);
        assert_eq!(row.id(Level::Municipality), Some(3500105));
    }
}
