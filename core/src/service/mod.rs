pub mod activity_service;
pub mod breakdown;
pub mod calendar;
pub mod dto;
pub mod label_service;
pub mod score;
pub mod stats;
pub mod trend;
