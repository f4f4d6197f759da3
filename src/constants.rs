pub mod placeholders {

    /// Shown in attendance detail when the responding account can't be resolved.
    pub const UNKNOWN_USER_NAME: &str = "Unknown User";

    pub const UNKNOWN_USER_EMAIL: &str = "No email";
}

pub mod limits {

    pub const MAX_NAME_LEN: usize = 200;

    pub const MAX_LOCATION_LEN: usize = 500;
}
