pub mod dataset;
pub mod genres;
pub mod merge;
pub mod mood;
pub mod providers;
pub mod recommend;
pub mod retriever;
pub mod sentiment;
