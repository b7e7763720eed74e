mod giveaway;

pub use giveaway::{GiveawayMap, GiveawayRecord};
