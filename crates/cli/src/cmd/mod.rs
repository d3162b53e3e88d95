mod generate;
mod init;
mod plan;
mod profiles;

pub use generate::cmd_generate;
pub use init::cmd_init;
pub use plan::cmd_plan;
pub use profiles::cmd_profiles;
