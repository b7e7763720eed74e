pub mod announcement;
pub mod creator;
pub mod registry;
pub mod scheduler;
pub mod selector;
pub mod surface;
