mod dto;
mod model;
mod repository;

pub use dto::{CreateClientDto, UpdateClientDto};
pub use model::{Client, ClientSummary, ClientView};
pub use repository::ClientRepository;
