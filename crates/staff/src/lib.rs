//! `bizgrid-staff` — staff members and the department tree.

pub mod department;
pub mod member;

pub use department::Department;
pub use member::{StaffMember, StaffStatus};
