//! Branch names, the state of HEAD and revision expressions

pub mod branch_name;
pub mod head;
pub mod revision;

/// Matches anything git refuses in a ref name component
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Prefix of branch refs, relative to the git directory
pub const REF_PREFIX: &str = "refs/heads/";

/// Prefix of a symbolic ref file
pub const SYMREF_PREFIX: &str = "ref: ";

/// `<rev>^`: first parent of a revision
pub const PARENT_REGEX: &str = r"^(.+)\^$";

/// `<rev>~<n>`: n-th first-parent ancestor of a revision
pub const ANCESTOR_REGEX: &str = r"^(.+)\~(\d+)$";

/// Shortest abbreviated object id accepted in a revision
pub const MIN_ABBREVIATED_LENGTH: usize = 4;
