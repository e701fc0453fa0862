pub mod attention;
pub mod features;
pub mod progress;
pub mod recommend;
pub mod rephrase;
pub mod sanitize;
pub mod sentiment;
