use strum::{Display, EnumString};

/// Game mode whose script slot is being replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Gametype {
    /// Multiplayer
    #[default]
    #[strum(to_string = "MP", serialize = "multiplayer")]
    Mp,
    /// Zombies
    #[strum(to_string = "ZM", serialize = "zombies")]
    Zm,
}

impl Gametype {
    /// Logical path the compiled script reports inside the target.
    pub fn destination(&self) -> &'static str {
        match self {
            Self::Mp => "maps/mp/gametypes/_clientids.gsc",
            Self::Zm => "maps/mp/gametypes_zm/_clientids.gsc",
        }
    }
}
