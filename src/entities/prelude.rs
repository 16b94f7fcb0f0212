pub use super::radcheck::Entity as Radcheck;
pub use super::radreply::Entity as Radreply;
pub use super::radusergroup::Entity as Radusergroup;
