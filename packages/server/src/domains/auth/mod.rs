pub mod account;
pub mod jwt;

pub use account::AdminAccount;
pub use jwt::{Claims, JwtService};
