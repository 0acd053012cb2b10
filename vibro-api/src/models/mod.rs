pub mod city;
pub mod company;
pub mod espectra;
pub mod image;
pub mod machine;
pub mod measurement;
pub mod point;
pub mod profile;
pub mod session;
pub mod tendency;
pub mod termo_image;
pub mod time_signal;
pub mod user;

pub use city::{City, NewCity};
pub use company::{Company, CompanyInput, NewCompany};
pub use espectra::{Espectra, NewEspectra};
pub use image::{Image, NewImage};
pub use machine::{Machine, MachineInput, NewMachine};
pub use measurement::{Measurement, MeasurementInput, NewMeasurement};
pub use point::{NewPoint, Point};
pub use profile::{NewProfile, Profile};
pub use session::{NewSession, Session};
pub use tendency::{NewTendency, Tendency};
pub use termo_image::{NewTermoImage, TermoImage};
pub use time_signal::{NewTimeSignal, TimeSignal};
pub use user::{NewUser, User, UserResponse};
