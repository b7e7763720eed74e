pub mod giveaway;
pub mod log_channel;
pub mod status;
