pub mod config;
pub mod logging;

pub mod downloader;
pub mod observe;
pub mod region;
pub mod retry;
pub mod service;
pub mod storage;
