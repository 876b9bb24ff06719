//! InMemory Repository 実装

mod message;
mod presence;
mod room;

pub use message::InMemoryMessageRepository;
pub use presence::InMemoryPresenceRepository;
pub use room::InMemoryRoomRepository;
