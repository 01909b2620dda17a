//! Router and route components

use dioxus::prelude::*;

mod dashboard;
mod home;
mod login;
mod register;

pub use dashboard::DashboardRoute;
pub use home::HomeRoute;
pub use login::LoginRoute;
pub use register::RegisterRoute;

#[derive(Clone, Debug, PartialEq, Routable)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    HomeRoute {},
    #[route("/login")]
    LoginRoute {},
    #[route("/register")]
    RegisterRoute {},
    #[route("/dashboard")]
    DashboardRoute {},
}
