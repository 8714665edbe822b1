pub mod catalog;
pub mod movies;
pub mod providers;
pub mod scoring;
pub mod similar;
