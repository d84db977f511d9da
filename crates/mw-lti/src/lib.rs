//! LTI 1.0 launch support for MW.
//!
//! A launch is a browser POST of signed form fields to the Mediawire LTI
//! endpoint. This crate assembles the launch parameter set from explicit
//! inputs ([`LtiLaunchConfig`]), signs it with OAuth 1.0a HMAC-SHA256
//! ([`sign`]), and renders the self-submitting form page ([`launch_form`]).
//! [`build_launch_page`] ties the pieces together behind the validation
//! checks a host application must run first.

mod form;
mod launch;
mod params;
mod sign;

pub use form::{error_page, launch_form};
pub use launch::{HostUser, LaunchError, LaunchRequest, build_launch_page};
pub use params::{LtiLaunchConfig, build_launch_params};
pub use sign::sign;
