/// Elemental affinity of units, abilities, equipment and Djinn.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    /// Earth
    Venus,
    /// Fire
    Mars,
    /// Water
    Mercury,
    /// Wind
    Jupiter,
    #[default]
    Neutral,
}

/// How a Djinn's element relates to the unit it is equipped on.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ElementRelation {
    Same,
    Counter,
    Neutral,
}

impl Element {
    /// The opposing element. Venus/Jupiter and Mars/Mercury are counter pairs.
    pub const fn counter(self) -> Option<Element> {
        match self {
            Element::Venus => Some(Element::Jupiter),
            Element::Jupiter => Some(Element::Venus),
            Element::Mars => Some(Element::Mercury),
            Element::Mercury => Some(Element::Mars),
            Element::Neutral => None,
        }
    }

    pub fn relation_to(self, other: Element) -> ElementRelation {
        if self == other {
            ElementRelation::Same
        } else if self.counter() == Some(other) {
            ElementRelation::Counter
        } else {
            ElementRelation::Neutral
        }
    }

    /// Damage multiplier (percent) for an attack of this element hitting `defender`.
    pub fn damage_percent_against(self, defender: Element) -> u32 {
        if self.counter() == Some(defender) {
            150
        } else {
            100
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_pairs_are_symmetric() {
        for element in [Element::Venus, Element::Mars, Element::Mercury, Element::Jupiter] {
            let counter = element.counter().unwrap();
            assert_eq!(counter.counter(), Some(element));
            assert_eq!(element.relation_to(counter), ElementRelation::Counter);
        }
    }

    #[test]
    fn neutral_has_no_counter() {
        assert_eq!(Element::Neutral.counter(), None);
        assert_eq!(Element::Neutral.relation_to(Element::Mars), ElementRelation::Neutral);
        assert_eq!(Element::Mars.relation_to(Element::Venus), ElementRelation::Neutral);
        assert_eq!(Element::Mars.relation_to(Element::Mars), ElementRelation::Same);
    }

    #[test]
    fn counter_element_takes_bonus_damage() {
        assert_eq!(Element::Mars.damage_percent_against(Element::Mercury), 150);
        assert_eq!(Element::Mars.damage_percent_against(Element::Mars), 100);
    }
}
