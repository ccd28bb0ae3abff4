pub mod chat;
pub mod shared;
pub mod sidebar;

pub use chat::ChatView;
pub use sidebar::SidebarView;
