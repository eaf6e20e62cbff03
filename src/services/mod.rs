mod admin;
mod conversations;
mod entitlements;
mod interests;
mod users;

pub use admin::AdminService;
pub use conversations::ConversationService;
pub use entitlements::EntitlementService;
pub use interests::InterestService;
pub use users::UserService;
