//! Login capability consumed when building a session.

/// What the external login provider knows about the current caller.
pub trait LoginProvider {
    /// Whether the caller passed authentication.
    fn is_access_allowed(&self) -> bool;

    /// Authenticated username, if any.
    fn get_username(&self) -> Option<String>;

    /// Whether the caller explicitly signed out of this session.
    fn has_signed_out(&self) -> bool;
}
