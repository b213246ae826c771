pub mod empty_dto;
