pub mod batch;
pub mod concat;
pub mod init;
pub mod run;
pub mod summarize;
