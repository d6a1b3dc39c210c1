//! Static species reference data.
//!
//! The class list below is the contract between the trained artifact and
//! this crate: the index of an identifier in [`CLASS_ORDER`] is the class
//! index the model's output vector refers to. Keep it in training order.

use serde::Serialize;

/// Number of classes the model was trained with.
pub const CLASS_COUNT: usize = 6;

/// Class identifiers in training order.
pub const CLASS_ORDER: [&str; CLASS_COUNT] = [
    "Moon_jellyfish",
    "barrel_jellyfish",
    "blue_jellyfish",
    "compass_jellyfish",
    "lions_mane_jellyfish",
    "mauve_stinger_jellyfish",
];

/// Sting danger tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Danger {
    Harmless,
    Low,
    Mild,
    Moderate,
    Strong,
    Painful,
}

impl Danger {
    /// Decorated label as shown in the narrative report.
    pub fn label(self) -> &'static str {
        match self {
            Danger::Harmless => "Harmless ✅",
            Danger::Low => "Low ✅",
            Danger::Mild => "Mild sting ⚠️",
            Danger::Moderate => "Moderate sting ⚠️",
            Danger::Strong => "Strong sting 🔴",
            Danger::Painful => "Painful sting 🔴",
        }
    }

    /// Label with icon glyphs stripped, for the tabular export.
    pub fn plain_label(self) -> &'static str {
        match self {
            Danger::Harmless => "Harmless",
            Danger::Low => "Low",
            Danger::Mild => "Mild sting",
            Danger::Moderate => "Moderate sting",
            Danger::Strong => "Strong sting",
            Danger::Painful => "Painful sting",
        }
    }
}

/// One species reference entry. Immutable, loaded at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeciesRecord {
    pub identifier: &'static str,
    pub display_name: &'static str,
    pub emoji: &'static str,
    pub scientific: &'static str,
    pub habitat: &'static str,
    pub size: &'static str,
    pub fact: &'static str,
    pub danger: Danger,
}

/// Reference records in class-index order.
static SPECIES: [SpeciesRecord; CLASS_COUNT] = [
    SpeciesRecord {
        identifier: "Moon_jellyfish",
        display_name: "Moon Jellyfish",
        emoji: "🌙",
        scientific: "Aurelia aurita",
        habitat: "Worldwide oceans",
        size: "Up to 40cm bell diameter",
        fact: "The most common jellyfish worldwide. The four pink/purple rings \
               visible through their translucent bell are their reproductive organs.",
        danger: Danger::Harmless,
    },
    SpeciesRecord {
        identifier: "barrel_jellyfish",
        display_name: "Barrel Jellyfish",
        emoji: "🪼",
        scientific: "Rhizostoma pulmo",
        habitat: "Atlantic Ocean, Mediterranean Sea",
        size: "Up to 90cm bell diameter",
        fact: "One of the largest jellyfish in UK waters, they are harmless to \
               humans and are actually a food source for leatherback sea turtles.",
        danger: Danger::Low,
    },
    SpeciesRecord {
        identifier: "blue_jellyfish",
        display_name: "Blue Jellyfish",
        emoji: "💙",
        scientific: "Cyanea lamarckii",
        habitat: "North Atlantic, North Sea",
        size: "Up to 30cm bell diameter",
        fact: "Their vivid blue or yellow colour fades as they age. They are most \
               commonly spotted in summer months near UK coasts.",
        danger: Danger::Mild,
    },
    SpeciesRecord {
        identifier: "compass_jellyfish",
        display_name: "Compass Jellyfish",
        emoji: "🧭",
        scientific: "Chrysaora hysoscella",
        habitat: "Eastern Atlantic, Mediterranean",
        size: "Up to 30cm bell diameter",
        fact: "Named after the brown compass-like markings on their bell. They are \
               an active predator, catching small fish and crustaceans.",
        danger: Danger::Moderate,
    },
    SpeciesRecord {
        identifier: "lions_mane_jellyfish",
        display_name: "Lion's Mane Jellyfish",
        emoji: "🦁",
        scientific: "Cyanea capillata",
        habitat: "Arctic, North Atlantic, North Pacific",
        size: "Up to 2m bell diameter",
        fact: "The world's largest known jellyfish species. Their tentacles can \
               extend over 30 meters, longer than a blue whale!",
        danger: Danger::Strong,
    },
    SpeciesRecord {
        identifier: "mauve_stinger_jellyfish",
        display_name: "Mauve Stinger Jellyfish",
        emoji: "💜",
        scientific: "Pelagia noctiluca",
        habitat: "Mediterranean, Atlantic, Indo-Pacific",
        size: "Up to 10cm bell diameter",
        fact: "They are bioluminescent and glow blue-green at night when disturbed. \
               Despite being small, their sting is surprisingly painful.",
        danger: Danger::Painful,
    },
];

/// Fallback entry for an identifier without a reference record. Should not
/// happen with the closed class list; lookup degrades to this instead of
/// failing.
static PLACEHOLDER: SpeciesRecord = SpeciesRecord {
    identifier: "unknown",
    display_name: "Unknown Species",
    emoji: "🪼",
    scientific: "",
    habitat: "",
    size: "",
    fact: "",
    danger: Danger::Harmless,
};

/// All reference records, in class-index order.
pub fn all() -> &'static [SpeciesRecord] {
    &SPECIES
}

/// Record for a class index.
pub fn by_index(index: usize) -> Option<&'static SpeciesRecord> {
    SPECIES.get(index)
}

/// Record for a species identifier.
pub fn lookup(identifier: &str) -> Option<&'static SpeciesRecord> {
    SPECIES.iter().find(|r| r.identifier == identifier)
}

/// The empty fallback record.
pub fn placeholder() -> &'static SpeciesRecord {
    &PLACEHOLDER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_follow_class_order() {
        assert_eq!(SPECIES.len(), CLASS_COUNT);
        for (idx, id) in CLASS_ORDER.iter().enumerate() {
            assert_eq!(SPECIES[idx].identifier, *id);
        }
    }

    #[test]
    fn lookup_hits_every_identifier() {
        for id in CLASS_ORDER {
            let record = lookup(id).expect("identifier must have a record");
            assert_eq!(record.identifier, id);
        }
        assert!(lookup("box_jellyfish").is_none());
    }

    #[test]
    fn by_index_matches_lookup() {
        for (idx, id) in CLASS_ORDER.iter().enumerate() {
            assert_eq!(by_index(idx).unwrap().identifier, *id);
        }
        assert!(by_index(CLASS_COUNT).is_none());
    }

    #[test]
    fn plain_danger_labels_carry_no_glyphs() {
        for record in all() {
            let plain = record.danger.plain_label();
            assert!(plain.is_ascii(), "glyph left in {plain:?}");
            assert_eq!(plain, plain.trim());
        }
    }

    #[test]
    fn placeholder_is_empty_but_usable() {
        let p = placeholder();
        assert_eq!(p.identifier, "unknown");
        assert!(p.scientific.is_empty());
    }
}
