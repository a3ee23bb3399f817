mod handler;
mod model;

pub use handler::{doctor_articles, doctor_profile, more_doctor_articles};
