mod dto;
mod model;
mod repository;

pub use dto::{CreateScheduleDto, ScheduleFilter, UpdateScheduleDto};
pub use model::{Schedule, ScheduleStatus};
pub use repository::ScheduleRepository;
