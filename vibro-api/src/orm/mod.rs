pub mod city;
pub mod company;
pub mod db;
pub mod espectra;
pub mod image;
pub mod login;
pub mod logout;
pub mod machine;
pub mod measurement;
pub mod point;
pub mod profile;
pub mod report_data;
pub mod scope;
pub mod tendency;
pub mod termo_image;
pub mod testing;
pub mod time_signal;
pub mod user;

pub use db::{DbConn, run_migrations_fairing, set_foreign_keys_fairing};
