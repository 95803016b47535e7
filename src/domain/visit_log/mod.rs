mod dto;
mod model;
mod repository;

pub use dto::{CreateVisitLogDto, UpdateVisitLogDto};
pub use model::VisitLog;
pub use repository::VisitLogRepository;
