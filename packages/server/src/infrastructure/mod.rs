//! Infrastructure layer: concrete repositories, message delivery and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
