//! Capability extraction from catalog feature flags and modalities.
//!
//! Every tag is independent; a model may carry any combination. The set is
//! returned as a `BTreeSet`, and [`Capability`] variants are declared in
//! lexicographic order of their names, so iteration order is both sorted and
//! stable across runs.

use std::collections::BTreeSet;

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::catalog::CatalogEntry;

/// A capability marker emitted into the registry file.
///
/// Variant order is the sort order. Keep it alphabetical.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumIter, EnumString,
)]
pub enum Capability {
    AudioInputSupport,
    AudioOutputSupport,
    ImageInputSupport,
    ImageOutputSupport,
    ReasoningSupport,
    StructuredOutputSupport,
    TextInputSupport,
    TextOutputSupport,
    ToolCallSupport,
    VideoInputSupport,
    VideoOutputSupport,
}

/// A modality listed under `modalities.input` or `modalities.output`.
///
/// Catalog modalities outside this set (for example `pdf`) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Modality {
    Text,
    Audio,
    Image,
    Video,
}

impl Modality {
    fn input_capability(self) -> Capability {
        match self {
            Modality::Text => Capability::TextInputSupport,
            Modality::Audio => Capability::AudioInputSupport,
            Modality::Image => Capability::ImageInputSupport,
            Modality::Video => Capability::VideoInputSupport,
        }
    }

    fn output_capability(self) -> Capability {
        match self {
            Modality::Text => Capability::TextOutputSupport,
            Modality::Audio => Capability::AudioOutputSupport,
            Modality::Image => Capability::ImageOutputSupport,
            Modality::Video => Capability::VideoOutputSupport,
        }
    }
}

fn parse_modalities(raw: &[String]) -> impl Iterator<Item = Modality> + '_ {
    raw.iter().filter_map(|m| m.parse::<Modality>().ok())
}

/// Derives the sorted, deduplicated capability set for one catalog entry.
///
/// Missing flags count as `false` and missing modality lists as empty.
/// `attachment = true` implies image input even without an `image` modality.
pub fn capabilities(entry: &CatalogEntry) -> BTreeSet<Capability> {
    let mut caps = BTreeSet::new();

    if entry.tool_call {
        caps.insert(Capability::ToolCallSupport);
    }
    if entry.reasoning {
        caps.insert(Capability::ReasoningSupport);
    }
    if entry.structured_output {
        caps.insert(Capability::StructuredOutputSupport);
    }
    if entry.attachment {
        caps.insert(Capability::ImageInputSupport);
    }

    caps.extend(parse_modalities(&entry.modalities.input).map(Modality::input_capability));
    caps.extend(parse_modalities(&entry.modalities.output).map(Modality::output_capability));

    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Modalities;
    use strum::IntoEnumIterator;

    fn entry_with(input: &[&str], output: &[&str]) -> CatalogEntry {
        CatalogEntry {
            modalities: Modalities {
                input: input.iter().map(|s| s.to_string()).collect(),
                output: output.iter().map(|s| s.to_string()).collect(),
            },
            ..CatalogEntry::default()
        }
    }

    fn names(caps: &BTreeSet<Capability>) -> Vec<String> {
        caps.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn declaration_order_is_lexicographic() {
        let declared: Vec<String> = Capability::iter().map(|c| c.to_string()).collect();
        let mut sorted = declared.clone();
        sorted.sort();
        assert_eq!(declared, sorted);
    }

    #[test]
    fn tool_call_only() {
        let entry = CatalogEntry {
            tool_call: true,
            ..CatalogEntry::default()
        };
        assert_eq!(names(&capabilities(&entry)), vec!["ToolCallSupport"]);
    }

    #[test]
    fn empty_entry_has_no_capabilities() {
        assert!(capabilities(&CatalogEntry::default()).is_empty());
    }

    #[test]
    fn text_chat_model() {
        let mut entry = entry_with(&["text"], &["text"]);
        entry.tool_call = true;
        assert_eq!(
            names(&capabilities(&entry)),
            vec!["TextInputSupport", "TextOutputSupport", "ToolCallSupport"]
        );
    }

    #[test]
    fn attachment_implies_image_input() {
        let entry = CatalogEntry {
            attachment: true,
            ..CatalogEntry::default()
        };
        assert!(capabilities(&entry).contains(&Capability::ImageInputSupport));
    }

    #[test]
    fn attachment_and_image_modality_do_not_duplicate() {
        let mut entry = entry_with(&["image"], &[]);
        entry.attachment = true;
        assert_eq!(names(&capabilities(&entry)), vec!["ImageInputSupport"]);
    }

    #[test]
    fn modality_order_does_not_matter() {
        let a = entry_with(&["video", "text", "audio", "image"], &["image", "text"]);
        let b = entry_with(&["image", "audio", "text", "video"], &["text", "image"]);
        assert_eq!(capabilities(&a), capabilities(&b));
    }

    #[test]
    fn duplicate_modalities_collapse() {
        let entry = entry_with(&["text", "text"], &["audio", "audio"]);
        assert_eq!(
            names(&capabilities(&entry)),
            vec!["AudioOutputSupport", "TextInputSupport"]
        );
    }

    #[test]
    fn unknown_modalities_are_ignored() {
        let entry = entry_with(&["pdf", "text"], &["embedding"]);
        assert_eq!(names(&capabilities(&entry)), vec!["TextInputSupport"]);
    }

    #[test]
    fn every_flag_and_modality() {
        let mut entry = entry_with(
            &["text", "audio", "image", "video"],
            &["text", "audio", "image", "video"],
        );
        entry.tool_call = true;
        entry.reasoning = true;
        entry.structured_output = true;
        let all: BTreeSet<Capability> = Capability::iter().collect();
        assert_eq!(capabilities(&entry), all);
    }
}
