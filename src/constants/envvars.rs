pub const ROOT_DIR: &str = "Y2E_ROOT_DIR";
pub const RESOURCES_DIR: &str = "Y2E_RESOURCES_DIR";

pub const LOG_LEVEL: &str = "LOGGING_LEVEL";
