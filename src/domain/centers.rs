use crate::domain::Gate;

/// Energy center a gate belongs to; the grouping behind center rings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Center {
    /// Head center.
    Head,
    /// Ajna center.
    Ajna,
    /// Throat center.
    Throat,
    /// G center.
    G,
    /// Ego (heart) center.
    Ego,
    /// Spleen center.
    Spleen,
    /// Solar plexus center.
    SolarPlexus,
    /// Sacral center.
    Sacral,
    /// Root center.
    Root,
}

impl Center {
    /// Lowercase slug used in module id strings (`center:sacral`).
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Ajna => "ajna",
            Self::Throat => "throat",
            Self::G => "g",
            Self::Ego => "ego",
            Self::Spleen => "spleen",
            Self::SolarPlexus => "solarplexus",
            Self::Sacral => "sacral",
            Self::Root => "root",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Ajna => "Ajna",
            Self::Throat => "Throat",
            Self::G => "G",
            Self::Ego => "Ego",
            Self::Spleen => "Spleen",
            Self::SolarPlexus => "Solar Plexus",
            Self::Sacral => "Sacral",
            Self::Root => "Root",
        }
    }

    /// Parse a slug back into a center.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "head" => Some(Self::Head),
            "ajna" => Some(Self::Ajna),
            "throat" => Some(Self::Throat),
            "g" => Some(Self::G),
            "ego" => Some(Self::Ego),
            "spleen" => Some(Self::Spleen),
            "solarplexus" => Some(Self::SolarPlexus),
            "sacral" => Some(Self::Sacral),
            "root" => Some(Self::Root),
            _ => None,
        }
    }

    /// Gates belonging to this center.
    pub fn gates(&self) -> impl Iterator<Item = Gate> {
        let this = *self;
        (1..=64u8).filter(move |&g| centers_of_gate(g).contains(&this))
    }
}

/// Centers a gate belongs to (every valid gate maps to exactly one).
pub fn centers_of_gate(gate: Gate) -> &'static [Center] {
    use Center::*;
    match gate {
        61 | 63 | 64 => &[Head],
        4 | 11 | 17 | 24 | 43 | 47 => &[Ajna],
        8 | 12 | 16 | 20 | 23 | 31 | 33 | 35 | 45 | 56 | 62 => &[Throat],
        1 | 2 | 7 | 10 | 13 | 15 | 25 | 46 => &[G],
        21 | 26 | 40 | 51 => &[Ego],
        18 | 28 | 32 | 44 | 48 | 50 | 57 => &[Spleen],
        6 | 22 | 30 | 36 | 37 | 49 | 55 => &[SolarPlexus],
        3 | 5 | 9 | 14 | 27 | 29 | 34 | 42 | 59 => &[Sacral],
        19 | 38 | 39 | 41 | 52 | 53 | 54 | 58 | 60 => &[Root],
        _ => &[],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/domain/centers.rs"]
mod tests;
