pub mod bitbucket;
pub mod deployment;
pub mod error;
pub mod gitlab;
