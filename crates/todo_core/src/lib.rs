pub mod accounts;
pub mod domain;
pub mod memory;
pub mod ports;

pub use domain::{Todo, TodoId, User, UserCredentials, UserId};
pub use memory::InMemoryDatabase;
pub use ports::{DatabaseService, PasswordService, PortError, PortResult};
