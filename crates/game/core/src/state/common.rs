use std::fmt;

/// Declares a string-backed identifier newtype for content and roster ids.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a unit inside a roster or battle. Unique across both sides of a battle.
    UnitId
);
string_id!(
    /// Identifier of an ability definition.
    AbilityId
);
string_id!(
    /// Identifier of a Djinn definition.
    DjinnId
);
string_id!(
    /// Identifier of an equipment item definition.
    EquipmentId
);
string_id!(
    /// Identifier of an enemy definition.
    EnemyId
);
string_id!(
    /// Identifier of an encounter (a fixed group of enemies).
    EncounterId
);
string_id!(
    /// Identifier of a tower floor definition.
    FloorId
);

/// Which side of a battle a unit fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub const fn is_player(self) -> bool {
        matches!(self, Side::Player)
    }
}
