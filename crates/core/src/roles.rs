//! Well-known role name constants carried in the `role` JWT claim.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CUSTOMER: &str = "customer";
