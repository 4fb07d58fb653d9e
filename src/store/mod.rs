//! [`ConversationStore`](crate::core::capability::ConversationStore) implementations.

pub mod file;
pub mod memory;

pub use file::FileConversationStore;
pub use memory::MemoryConversationStore;
