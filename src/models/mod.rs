pub mod admin;
pub mod interest;
pub mod message;
pub mod user;

pub use admin::{
    AuditAction, AuditLog, ListUsersParams, NewAuditLog, PlatformStats, ReportStatus, UserReport,
};
pub use interest::{Interest, InterestRole, InterestStatus, ResolveDecision};
pub use message::Message;
pub use user::{
    AccountStatus, Gender, ModerationStatus, NewUser, PlanType, ProfileFilter, User, UserRole,
};
