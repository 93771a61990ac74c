//! Partial updates of a printer's manual override
//!
//! The dashboard edits a typed [`OverrideDraft`] and sends only the
//! sub-fields that changed. Empty strings clear `name`, `notes` and `type`;
//! an empty `paperSizes` list and an explicit `duplex: null` defer those
//! fields back to the agent.

use serde::{Deserialize, Deserializer, Serialize};

use super::capability::{Capabilities, normalize};
use super::printer::ManualOverride;
use crate::error::{AppError, AppResult};

/// Longest accepted printer display name
pub const MAX_NAME_LEN: usize = 64;
/// Longest accepted operator note
pub const MAX_NOTES_LEN: usize = 500;

/// Typed, editable form of a manual override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideDraft {
    pub name: Option<String>,
    pub capabilities: Capabilities,
    pub notes: Option<String>,
}

impl OverrideDraft {
    pub fn from_override(source: Option<&ManualOverride>) -> Self {
        match source {
            Some(o) => Self {
                name: o.name.clone().filter(|n| !n.is_empty()),
                capabilities: normalize(&o.capabilities),
                notes: o.notes.clone().filter(|n| !n.is_empty()),
            },
            None => Self::default(),
        }
    }

    pub fn into_override(self) -> ManualOverride {
        ManualOverride {
            name: self.name,
            capabilities: self.capabilities.to_value(),
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// `Some(None)` is sent as `null` and clears the override
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub duplex: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_sizes: Option<Vec<String>>,
}

impl CapabilitiesPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.duplex.is_none() && self.paper_sizes.is_none()
    }
}

/// Body of `PATCH /shops/{shop_id}/printers/{printer_id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverridePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<CapabilitiesPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

impl OverridePatch {
    /// Only the sub-fields that differ between `before` and `after`
    pub fn diff(before: &OverrideDraft, after: &OverrideDraft) -> Self {
        let caps = CapabilitiesPatch {
            kind: changed(&before.capabilities.kind, &after.capabilities.kind)
                .map(Option::unwrap_or_default),
            duplex: changed(&before.capabilities.duplex, &after.capabilities.duplex),
            paper_sizes: changed(
                &before.capabilities.paper_sizes,
                &after.capabilities.paper_sizes,
            ),
        };

        Self {
            name: changed(&before.name, &after.name).map(Option::unwrap_or_default),
            capabilities: (!caps.is_empty()).then_some(caps),
            notes: changed(&before.notes, &after.notes).map(Option::unwrap_or_default),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.notes.is_none()
            && self.capabilities.as_ref().is_none_or(CapabilitiesPatch::is_empty)
    }

    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name
            && name.chars().count() > MAX_NAME_LEN
        {
            return Err(AppError::validation(format!(
                "Printer name exceeds {} characters",
                MAX_NAME_LEN
            ))
            .with_detail("field", "name"));
        }
        if let Some(notes) = &self.notes
            && notes.chars().count() > MAX_NOTES_LEN
        {
            return Err(AppError::validation(format!(
                "Notes exceed {} characters",
                MAX_NOTES_LEN
            ))
            .with_detail("field", "notes"));
        }
        if let Some(sizes) = self.capabilities.as_ref().and_then(|c| c.paper_sizes.as_ref())
            && sizes.iter().any(|s| s.trim().is_empty())
        {
            return Err(AppError::validation("Paper sizes must not be blank")
                .with_detail("field", "capabilities.paperSizes"));
        }
        Ok(())
    }

    /// Merge this patch into the stored override
    pub fn apply(&self, current: Option<&ManualOverride>) -> ManualOverride {
        let mut draft = OverrideDraft::from_override(current);

        if let Some(name) = &self.name {
            draft.name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
        }
        if let Some(notes) = &self.notes {
            draft.notes = Some(notes.clone()).filter(|n| !n.is_empty());
        }
        if let Some(caps) = &self.capabilities {
            if let Some(kind) = &caps.kind {
                draft.capabilities.kind = Some(kind.clone()).filter(|k| !k.is_empty());
            }
            if let Some(duplex) = caps.duplex {
                draft.capabilities.duplex = duplex;
            }
            if let Some(sizes) = &caps.paper_sizes {
                draft.capabilities.paper_sizes = sizes.iter().map(|s| s.trim().to_string()).collect();
            }
        }

        draft.into_override()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(name: Option<&str>, kind: Option<&str>, duplex: Option<bool>) -> OverrideDraft {
        OverrideDraft {
            name: name.map(String::from),
            capabilities: Capabilities {
                kind: kind.map(String::from),
                duplex,
                paper_sizes: vec![],
            },
            notes: None,
        }
    }

    #[test]
    fn test_diff_contains_only_changed_fields() {
        let before = draft(Some("HP"), Some("B/W"), Some(true));
        let after = draft(Some("HP"), Some("Color"), Some(true));

        let patch = OverridePatch::diff(&before, &after);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"capabilities": {"type": "Color"}})
        );
    }

    #[test]
    fn test_diff_of_identical_drafts_is_empty() {
        let d = draft(Some("HP"), None, Some(false));
        assert!(OverridePatch::diff(&d, &d).is_empty());
    }

    #[test]
    fn test_diff_clearing_duplex_sends_null() {
        let patch = OverridePatch::diff(&draft(None, None, Some(true)), &draft(None, None, None));
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"capabilities": {"duplex": null}})
        );
    }

    #[test]
    fn test_patch_deserialize_distinguishes_null_from_missing() {
        let patch: OverridePatch =
            serde_json::from_value(json!({"capabilities": {"duplex": null}})).unwrap();
        assert_eq!(patch.capabilities.unwrap().duplex, Some(None));

        let patch: OverridePatch =
            serde_json::from_value(json!({"capabilities": {"type": "Color"}})).unwrap();
        assert_eq!(patch.capabilities.unwrap().duplex, None);
    }

    #[test]
    fn test_apply_merges_into_existing_override() {
        let current = ManualOverride {
            name: Some("Front".into()),
            capabilities: json!([{"type": "Color", "duplex": false}]),
            notes: Some("old".into()),
        };
        let patch = OverridePatch {
            capabilities: Some(CapabilitiesPatch {
                paper_sizes: Some(vec!["A4".into(), " A3 ".into()]),
                ..Default::default()
            }),
            notes: Some(String::new()),
            ..Default::default()
        };

        let merged = patch.apply(Some(&current));
        assert_eq!(merged.name.as_deref(), Some("Front"));
        assert_eq!(merged.notes, None);
        assert_eq!(
            merged.capabilities,
            json!({"type": "Color", "duplex": false, "paperSizes": ["A4", "A3"]})
        );
    }

    #[test]
    fn test_apply_clears_duplex_and_type() {
        let current = ManualOverride {
            capabilities: json!({"type": "Color", "duplex": true}),
            ..Default::default()
        };
        let patch = OverridePatch {
            capabilities: Some(CapabilitiesPatch {
                kind: Some(String::new()),
                duplex: Some(None),
                paper_sizes: None,
            }),
            ..Default::default()
        };
        let merged = patch.apply(Some(&current));
        assert_eq!(merged.capabilities, json!({"paperSizes": []}));
    }

    #[test]
    fn test_validate() {
        let ok = OverridePatch {
            name: Some("Counter".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let long = OverridePatch {
            name: Some("x".repeat(MAX_NAME_LEN + 1)),
            ..Default::default()
        };
        assert!(long.validate().is_err());

        let blank = OverridePatch {
            capabilities: Some(CapabilitiesPatch {
                paper_sizes: Some(vec!["A4".into(), "  ".into()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = blank.validate().unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationFailed);
    }
}
