pub mod giveaway;
pub mod invite;
