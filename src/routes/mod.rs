mod health_check;
mod home;
mod submissions;

pub use health_check::*;
pub use home::*;
pub use submissions::*;
