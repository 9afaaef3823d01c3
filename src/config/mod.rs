//! Configuration module

mod site;

pub use site::GithubConfig;
pub use site::SiteConfig;
pub use site::TOKEN_ENV;
