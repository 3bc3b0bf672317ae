use std::fmt;

/// A raw host form identifier. Every entity the host owns (keywords, perks,
/// ingredients, potions, furniture, actors, constructible objects) has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormId(pub u32);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

macro_rules! form_kinds {
    ($($(#[$meta:meta])* $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name(pub FormId);

            impl $name {
                /// The untyped form identifier.
                pub fn form(self) -> FormId {
                    self.0
                }
            }

            impl From<$name> for FormId {
                fn from(id: $name) -> FormId {
                    id.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }
        )*
    };
}

form_kinds! {
    /// A tag that can be attached to any form.
    KeywordId;
    /// A perk the player may hold.
    PerkId;
    /// An alchemy ingredient.
    IngredientId;
    /// A craftable potion or poison variant.
    PotionId;
    /// A magic effect shared by ingredients and potions.
    EffectId;
    /// A furniture base object (workbenches).
    FurnitureId;
    /// An actor reference. The player is one of these.
    ActorId;
    /// A constructible object created by the recipe synthesizer.
    RecipeId;
}
