mod handler;

pub use handler::{add_doctor, add_user, current_user, logout, session_identity};
