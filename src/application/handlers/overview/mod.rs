//! Sidebar and dashboard query handlers.

mod dashboard;
mod sidebar;

pub use dashboard::{DashboardHandler, DashboardStats};
pub use sidebar::{Sidebar, SidebarHandler};
