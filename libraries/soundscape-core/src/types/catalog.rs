//! Catalog entry types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::ids::{ElementId, SoundId};
use crate::error::{CoreError, Result};

/// Type tag that partitions the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundType {
    /// Multi-layered ambient preset; at most one plays at a time
    Mood,
    /// Individually triggerable sound (one-shots, music, loops)
    Element,
}

impl SoundType {
    /// All sound types, in display order
    pub const ALL: [SoundType; 2] = [SoundType::Mood, SoundType::Element];

    /// Lowercase name used in exports and settings
    pub fn as_str(self) -> &'static str {
        match self {
            SoundType::Mood => "mood",
            SoundType::Element => "element",
        }
    }

    /// Single-letter id prefix (`m` / `e`)
    pub fn prefix(self) -> &'static str {
        match self {
            SoundType::Mood => "m",
            SoundType::Element => "e",
        }
    }

    /// Resolve an id prefix back to a type
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "m" | "M" => Some(SoundType::Mood),
            "e" | "E" => Some(SoundType::Element),
            _ => None,
        }
    }

    /// Plural path segment used by the remote API (`moods` / `elements`)
    pub fn path_segment(self) -> &'static str {
        match self {
            SoundType::Mood => "moods",
            SoundType::Element => "elements",
        }
    }
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mood" => Ok(SoundType::Mood),
            "element" => Ok(SoundType::Element),
            _ => Err(CoreError::UnknownSoundType(s.to_string())),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// One flat record from the bulk export or the bundled CSV.
///
/// Every field is optional at this level; [`CatalogEntry::from_row`]
/// decides what is required. Both the camelCase field names and the
/// snake_case export names are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    /// `m:123`, `e:123` or a bare number
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,

    /// `mood` or `element`
    #[serde(default, rename = "type")]
    pub sound_type: Option<String>,

    /// Display label
    #[serde(default)]
    pub name: Option<String>,

    /// Parent soundset label
    #[serde(default, alias = "soundset", alias = "soundset_name")]
    pub soundset_name: Option<String>,

    /// Parent soundset URL
    #[serde(default, alias = "soundset_url")]
    pub soundset_url: Option<String>,

    /// Product or pack the sound ships in
    #[serde(default, alias = "product_or_pack")]
    pub product_or_pack: Option<String>,

    /// Publication status
    #[serde(default)]
    pub status: Option<String>,

    /// Sub category
    #[serde(default, alias = "subcategory", alias = "sub_category")]
    pub sub_category: Option<String>,

    /// Sub type (`oneshot`, `music`, ...)
    #[serde(default, alias = "sub_type", alias = "subtype")]
    pub sub_type: Option<String>,

    /// Any other column, kept for literal filtering
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A playable mood or element.
///
/// Built in bulk from [`CatalogRow`]s and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Numeric id, unique within its type partition
    pub id: ElementId,
    /// Partition tag
    #[serde(rename = "type")]
    pub sound_type: SoundType,
    /// Display label
    pub name: String,
    /// Parent soundset label
    pub soundset_name: Option<String>,
    /// Parent soundset URL
    pub soundset_url: Option<String>,
    /// Product or pack
    pub product_or_pack: Option<String>,
    /// Publication status
    pub status: Option<String>,
    /// Sub category
    pub sub_category: Option<String>,
    /// Sub type
    pub sub_type: Option<String>,
    /// Extra attributes, compared literally by unrecognised filter fields
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

impl CatalogEntry {
    /// Validate and convert a raw row.
    ///
    /// `id`, `type` and `name` are required. A prefixed id must agree with
    /// the row's type.
    pub fn from_row(row: CatalogRow) -> Result<Self> {
        let raw_type = non_blank(row.sound_type).ok_or(CoreError::MissingField("type"))?;
        let sound_type: SoundType = raw_type.parse()?;

        let raw_id = non_blank(row.id).ok_or(CoreError::MissingField("id"))?;
        let sound_id = SoundId::parse(&raw_id)
            .map_err(|_| CoreError::invalid_field("id", format!("{raw_id:?} is not a sound id")))?;
        if let Some(kind) = sound_id.kind() {
            if kind != sound_type {
                return Err(CoreError::invalid_field(
                    "id",
                    format!("prefix of {raw_id:?} does not match type {sound_type}"),
                ));
            }
        }

        let name = non_blank(row.name).ok_or(CoreError::MissingField("name"))?;

        let extra = row
            .extra
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();

        Ok(Self {
            id: sound_id.element_id(),
            sound_type,
            name,
            soundset_name: non_blank(row.soundset_name),
            soundset_url: non_blank(row.soundset_url),
            product_or_pack: non_blank(row.product_or_pack),
            status: non_blank(row.status),
            sub_category: non_blank(row.sub_category),
            sub_type: non_blank(row.sub_type),
            extra,
        })
    }

    /// Type-qualified id (`m:123` / `e:123`)
    pub fn sound_id(&self) -> SoundId {
        SoundId::typed(self.sound_type, self.id)
    }

    /// Whether the sub type marks this as a one-shot.
    ///
    /// Matches `oneshot`, `one-shot`, `One Shot` and friends.
    pub fn is_one_shot(&self) -> bool {
        self.sub_type.as_deref().is_some_and(|sub_type| {
            sub_type
                .chars()
                .filter(|c| !matches!(c, '-' | '_' | ' '))
                .collect::<String>()
                .eq_ignore_ascii_case("oneshot")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, sound_type: &str, name: &str) -> CatalogRow {
        CatalogRow {
            id: Some(id.to_string()),
            sound_type: Some(sound_type.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn row_deserializes_export_names() {
        let row: CatalogRow = serde_json::from_value(json!({
            "id": 12,
            "type": "element",
            "name": "Sword clash",
            "soundset": "Battle",
            "product_or_pack": "CoreSet",
            "sub_type": "oneshot",
            "subcategory": "Combat",
            "rating": 5
        }))
        .unwrap();

        assert_eq!(row.id.as_deref(), Some("12"));
        assert_eq!(row.soundset_name.as_deref(), Some("Battle"));
        assert_eq!(row.product_or_pack.as_deref(), Some("CoreSet"));
        assert_eq!(row.sub_type.as_deref(), Some("oneshot"));
        assert_eq!(row.sub_category.as_deref(), Some("Combat"));
        assert_eq!(row.extra.get("rating"), Some(&json!(5)));
    }

    #[test]
    fn entry_from_row_requires_fields() {
        let mut missing_id = row("1", "mood", "Tavern");
        missing_id.id = None;
        assert!(matches!(
            CatalogEntry::from_row(missing_id),
            Err(CoreError::MissingField("id"))
        ));

        let blank_name = row("1", "mood", "   ");
        assert!(matches!(
            CatalogEntry::from_row(blank_name),
            Err(CoreError::MissingField("name"))
        ));

        assert!(matches!(
            CatalogEntry::from_row(row("1", "playlist", "Tavern")),
            Err(CoreError::UnknownSoundType(_))
        ));
    }

    #[test]
    fn prefixed_id_must_match_type() {
        assert!(CatalogEntry::from_row(row("m:3", "mood", "Tavern")).is_ok());
        assert!(CatalogEntry::from_row(row("e:3", "mood", "Tavern")).is_err());
    }

    #[test]
    fn one_shot_detection_ignores_spelling() {
        for spelling in ["oneshot", "One-Shot", "one_shot", "ONE SHOT"] {
            let mut r = row("e:1", "element", "Bang");
            r.sub_type = Some(spelling.to_string());
            assert!(CatalogEntry::from_row(r).unwrap().is_one_shot(), "{spelling}");
        }

        let mut music = row("e:2", "element", "Theme");
        music.sub_type = Some("music".to_string());
        assert!(!CatalogEntry::from_row(music).unwrap().is_one_shot());
    }
}
