pub mod gitlab;
pub mod view;
