pub mod prelude;

pub mod radcheck;
pub mod radreply;
pub mod radusergroup;
